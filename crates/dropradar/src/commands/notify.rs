//! Push notification handlers.

use dropradar_core::Dashboard;

use crate::cli::{GlobalOpts, NotifyArgs, NotifyCommand};
use crate::config::{self, Resolved};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    args: NotifyArgs,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        NotifyCommand::Test { bark_key } => {
            let key = config::resolve_bark_key(
                bark_key.as_deref(),
                &resolved.profile,
                &resolved.profile_name,
            )
            .ok_or_else(|| CliError::NoBarkKey {
                profile: resolved.profile_name.clone(),
            })?;

            let message = Dashboard::oneshot(resolved.dashboard.clone(), |dash| async move {
                dash.test_notification(&key).await
            })
            .await?;

            let color = output::should_color(global.color);
            output::notice(&output::success(&message, color), global.quiet);
            Ok(())
        }
    }
}
