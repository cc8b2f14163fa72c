//! Profile inspection commands

use anyhow::Result;
use sizer_lib::PerformanceProfile;

use crate::client::ApiClient;
use crate::config::Settings;
use crate::output::{print_info, print_profile, print_success};

/// Show the profile plans are computed with
pub async fn show(remote: bool, settings: &Settings) -> Result<()> {
    let profile = if remote {
        print_info(&format!("Profile served by {}", settings.api_url));
        ApiClient::new(&settings.api_url)?.profile().await?
    } else {
        settings.load_profile()?
    };

    print_profile(&profile, settings.format)
}

/// Parse and validate a profile file
pub fn validate(path: &str) -> Result<()> {
    let profile = PerformanceProfile::from_json_file(path)?;
    print_success(&format!(
        "Profile '{}' is valid ({} event sizes)",
        profile.name,
        profile.event_sizes.len()
    ));
    Ok(())
}
