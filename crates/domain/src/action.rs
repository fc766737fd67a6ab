//! Extension actions a routine may one day perform.
//!
//! None of these are invoked by the current reactions. Dispatchers opt in by
//! overriding `ActionDispatcher::perform_extension`; the default reports the
//! action as unsupported.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionAction {
    CloseBlindsAndCurtains,
    OpenBlindsAndCurtains,
    TurnOffFans,
    TurnOffMultimedia,
    /// Wait for the host to confirm the previous commands landed.
    AwaitConfirmation,
    /// Check lights and warm water ended up in the expected state.
    VerifyLightsAndWarmWater,
}

impl std::fmt::Display for ExtensionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::CloseBlindsAndCurtains => "close_blinds_and_curtains",
            Self::OpenBlindsAndCurtains => "open_blinds_and_curtains",
            Self::TurnOffFans => "turn_off_fans",
            Self::TurnOffMultimedia => "turn_off_multimedia",
            Self::AwaitConfirmation => "await_confirmation",
            Self::VerifyLightsAndWarmWater => "verify_lights_and_warm_water",
        };
        f.write_str(name)
    }
}
