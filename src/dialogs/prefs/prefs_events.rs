//! Preferences/settings events.

#[derive(Clone, Debug)]
pub struct ResetSettingsEvent;

#[derive(Clone, Debug)]
pub struct ToggleSettingsEvent;

#[derive(Clone, Debug)]
pub struct ToggleSavedListsEvent;

/// Audio on/off changed in the settings window
#[derive(Clone, Debug)]
pub struct AudioEnabledChangedEvent(pub bool);

/// Spin tuning changed in the settings window
#[derive(Clone, Debug)]
pub struct SpinParamsChangedEvent;
