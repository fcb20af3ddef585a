use crate::error::{ReleasyError, Result};
use crate::release::ReleaseConfig;
use crate::runner::{display_command, CommandRunner, RunOptions};
use crate::ui::{Confirmer, Logger};

/// Marker npm prints when a one-time password is missing or wrong
pub const OTP_SIGNATURE: &str = "EOTP";

/// Default number of prompts after a rejected password
pub const OTP_RETRIES: u32 = 3;

const RETRY_NOTICE: &str = "Incorrect or expired OTP";

/// `npm publish [--tag T] [--otp C] [folder]`
pub fn npm_publish_argv(config: &ReleaseConfig, otp: Option<&str>) -> Vec<String> {
    let mut argv = vec!["npm".to_string(), "publish".to_string()];
    if let Some(tag) = config.npm_tag.as_deref().filter(|t| !t.is_empty()) {
        argv.push("--tag".to_string());
        argv.push(tag.to_string());
    }
    if let Some(otp) = otp {
        argv.push("--otp".to_string());
        argv.push(otp.to_string());
    }
    if let Some(folder) = &config.npm_folder {
        argv.push(folder.display().to_string());
    }
    argv
}

/// Publish to npm, asking for one-time passwords as long as npm wants one
///
/// At most `retries` passwords are asked for; once they run out the release
/// fails with [`ReleasyError::OtpExhausted`].
pub fn publish(
    config: &ReleaseConfig,
    runner: &dyn CommandRunner,
    confirmer: &dyn Confirmer,
    logger: &dyn Logger,
    otp: Option<String>,
    retries: u32,
) -> Result<()> {
    let mut retries = retries;
    let mut otp = otp;
    let mut notice: Option<&str> = None;

    loop {
        let argv = npm_publish_argv(config, otp.as_deref());

        if !config.dry_run {
            let options = RunOptions::captured().with_timeout(config.timeout);
            if let Err(err) = runner.run(&argv, &options)?.check(&argv) {
                let output = err.command_output().unwrap_or_default();
                if !output.contains(OTP_SIGNATURE) {
                    return Err(ReleasyError::publish(format!("{}\n{}", err, output.trim())));
                }
                if retries == 0 {
                    return Err(ReleasyError::OtpExhausted);
                }

                tracing::debug!(retries, "npm asked for a one-time password");
                otp = Some(
                    confirmer
                        .one_time_password(notice)?
                        .ok_or(ReleasyError::OtpRequired)?,
                );
                notice = Some(RETRY_NOTICE);
                retries -= 1;
                continue;
            }
        }

        if !config.quiet {
            let mut message = format!("Published {} to npm", config.new_version);
            if let Some(tag) = config.npm_tag.as_deref().filter(|t| !t.is_empty()) {
                message.push_str(&format!(" with a tag of \"{}\"", tag));
            }
            logger.step(&message, &display_command(&argv));
        }
        return Ok(());
    }
}
