// src/hardware/switch.rs - Heater driven by external commands
use super::{HardwareError, HeaterSwitch};
use async_trait::async_trait;
use tokio::process::Command;

/// Runs one program to switch the heater on and another to switch it off.
///
/// Fits smart plugs and relay boards that ship a CLI. A non-zero exit status
/// counts as a failed command.
#[derive(Debug, Clone)]
pub struct CommandHeater {
    on: Vec<String>,
    off: Vec<String>,
}

impl CommandHeater {
    pub fn new(on: Vec<String>, off: Vec<String>) -> Result<Self, HardwareError> {
        if on.is_empty() || off.is_empty() {
            return Err(HardwareError::Fault("heater command line is empty".into()));
        }
        Ok(Self { on, off })
    }

    async fn run(argv: &[String]) -> Result<(), HardwareError> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| HardwareError::Fault("heater command line is empty".into()))?;
        let output = Command::new(program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await?;
        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(HardwareError::CommandFailed(format!(
                "`{}` exited with {}: {}",
                argv.join(" "),
                output.status,
                stderr.trim()
            )))
        }
    }
}

#[async_trait]
impl HeaterSwitch for CommandHeater {
    async fn set(&self, on: bool) -> Result<(), HardwareError> {
        let argv = if on { &self.on } else { &self.off };
        tracing::debug!("Running heater command: {}", argv.join(" "));
        Self::run(argv).await
    }

    fn name(&self) -> &str {
        "command"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_command_rejected() {
        assert!(CommandHeater::new(vec![], argv(&["true"])).is_err());
    }

    #[tokio::test]
    async fn test_exit_status_decides_success() {
        let heater = CommandHeater::new(argv(&["true"]), argv(&["false"])).unwrap();
        assert!(heater.set(true).await.is_ok());
        assert!(matches!(heater.set(false).await, Err(HardwareError::CommandFailed(_))));
    }

    #[tokio::test]
    async fn test_missing_program_is_io_error() {
        let heater = CommandHeater::new(argv(&["/nonexistent/plugctl", "on"]), argv(&["true"])).unwrap();
        assert!(matches!(heater.set(true).await, Err(HardwareError::Io(_))));
    }
}
