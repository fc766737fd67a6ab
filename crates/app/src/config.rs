//! Routine configuration — read once from the host's app arguments.
//!
//! Arguments arrive as a loosely typed key/value map. Every required key
//! must be present; `prep_offset_minutes` must be an integer (or a string
//! holding one). Failures are logged and returned, aborting startup.
//!
//! Fractional offsets such as `12.5` are rejected rather than truncated to
//! whole minutes, and so are offsets too large to express as a time span.

use chrono::TimeDelta;
use serde_json::{Map, Value};

use routines_domain::error::ConfigError;
use routines_domain::id::EntityId;
use routines_domain::time::LocalZone;

/// Loosely typed app arguments, as handed over by the host.
pub type AppArgs = Map<String, Value>;

pub const TURN_OFF_LIGHTS_SCENE: &str = "turn_off_lights_scene";
/// Misspelled key still found in older deployments.
pub const TURN_OFF_LIGHTS_SCENE_LEGACY: &str = "turn_off_ligts_scene";
pub const WARM_WATER: &str = "ww_activate";
pub const AWAKE_STATE: &str = "awake_state";
pub const NEXT_AWAKE_TIME: &str = "next_awake_time";
pub const PREP_OFFSET_MINUTES: &str = "prep_offset_minutes";
pub const GOODMORNING_LIGHTS_SCENE: &str = "goodmorning_lights_scene";

/// Immutable routine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineConfig {
    pub turn_off_lights_scene: EntityId,
    pub goodmorning_lights_scene: Option<EntityId>,
    pub warm_water: EntityId,
    pub awake_state: EntityId,
    pub next_awake_time: EntityId,
    pub prep_offset_minutes: i64,
    /// Zone assumed for wake times without an offset.
    pub local_zone: LocalZone,
}

impl RoutineConfig {
    /// Build the configuration from host app arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingArgument`] for an absent required key,
    /// [`ConfigError::InvalidInteger`] when the offset is not an integer, and
    /// [`ConfigError::InvalidType`] / [`ConfigError::EmptyEntityId`] for
    /// entity ids that are not non-empty strings.
    pub fn from_args(args: &AppArgs) -> Result<Self, ConfigError> {
        Self::load(args)
            .inspect_err(|err| tracing::error!(error = %err, "invalid routine configuration"))
    }

    fn load(args: &AppArgs) -> Result<Self, ConfigError> {
        let turn_off_lights_scene = required_entity(
            args,
            TURN_OFF_LIGHTS_SCENE,
            &[TURN_OFF_LIGHTS_SCENE_LEGACY],
        )?;
        let warm_water = required_entity(args, WARM_WATER, &[])?;
        let awake_state = required_entity(args, AWAKE_STATE, &[])?;
        let next_awake_time = required_entity(args, NEXT_AWAKE_TIME, &[])?;
        let prep_offset_minutes = offset_minutes(args, PREP_OFFSET_MINUTES)?;
        let goodmorning_lights_scene = optional_entity(args, GOODMORNING_LIGHTS_SCENE)?;

        Ok(Self {
            turn_off_lights_scene,
            goodmorning_lights_scene,
            warm_water,
            awake_state,
            next_awake_time,
            prep_offset_minutes,
            local_zone: LocalZone::System,
        })
    }

    /// Replace the zone used for offset-less wake times.
    #[must_use]
    pub fn with_local_zone(mut self, zone: LocalZone) -> Self {
        self.local_zone = zone;
        self
    }
}

fn lookup<'a>(args: &'a AppArgs, key: &'static str, aliases: &[&'static str]) -> Option<&'a Value> {
    if let Some(value) = args.get(key).filter(|v| !v.is_null()) {
        return Some(value);
    }
    aliases.iter().find_map(|&alias| {
        let value = args.get(alias)?;
        tracing::warn!(alias, key, "using legacy app argument, please rename it");
        Some(value)
    })
}

fn required_entity(
    args: &AppArgs,
    key: &'static str,
    aliases: &[&'static str],
) -> Result<EntityId, ConfigError> {
    match lookup(args, key, aliases) {
        None | Some(Value::Null) => Err(ConfigError::MissingArgument { key }),
        Some(value) => entity_from_value(key, value),
    }
}

fn optional_entity(args: &AppArgs, key: &'static str) -> Result<Option<EntityId>, ConfigError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(value) => entity_from_value(key, value).map(Some),
    }
}

fn entity_from_value(key: &'static str, value: &Value) -> Result<EntityId, ConfigError> {
    match value {
        Value::String(s) => EntityId::new(s.as_str()),
        _ => Err(ConfigError::InvalidType {
            key,
            expected: "an entity id string",
        }),
    }
}

fn offset_minutes(args: &AppArgs, key: &'static str) -> Result<i64, ConfigError> {
    let minutes = required_integer(args, key)?;
    if TimeDelta::try_minutes(minutes).is_none() {
        return Err(ConfigError::InvalidInteger {
            key,
            value: minutes.to_string(),
        });
    }
    Ok(minutes)
}

fn required_integer(args: &AppArgs, key: &'static str) -> Result<i64, ConfigError> {
    let invalid = |value: &Value| ConfigError::InvalidInteger {
        key,
        value: match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
    };
    match args.get(key) {
        None | Some(Value::Null) => Err(ConfigError::MissingArgument { key }),
        Some(value @ Value::Number(n)) => n.as_i64().ok_or_else(|| invalid(value)),
        Some(value @ Value::String(s)) => s.trim().parse().map_err(|_| invalid(value)),
        Some(value) => Err(invalid(value)),
    }
}
