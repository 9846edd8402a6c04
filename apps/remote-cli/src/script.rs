use anyhow::{anyhow, bail, Result};
use command_registry::CommandRegistry;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// One button press in a `remote run` script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "step", content = "slot", rename_all = "snake_case")]
pub enum Step {
    On(usize),
    Off(usize),
    Clear(usize),
    Undo,
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("undo") {
            return Ok(Step::Undo);
        }
        let (verb, slot) = s
            .split_once(':')
            .ok_or_else(|| anyhow!("expected on:N, off:N, clear:N or undo, got '{s}'"))?;
        let slot: usize = slot
            .trim()
            .parse()
            .map_err(|e| anyhow!("bad slot in '{s}': {e}"))?;
        match verb.trim().to_ascii_lowercase().as_str() {
            "on" => Ok(Step::On(slot)),
            "off" => Ok(Step::Off(slot)),
            "clear" => Ok(Step::Clear(slot)),
            other => bail!("unknown step '{other}'"),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::On(n) => write!(f, "on:{n}"),
            Step::Off(n) => write!(f, "off:{n}"),
            Step::Clear(n) => write!(f, "clear:{n}"),
            Step::Undo => f.write_str("undo"),
        }
    }
}

pub fn parse_steps(raw: &[String]) -> Result<Vec<Step>> {
    raw.iter().map(|s| s.parse()).collect()
}

/// Apply `steps` in order, stopping at the first rejected slot.
pub fn apply(registry: &mut CommandRegistry, steps: &[Step]) -> Result<()> {
    for (i, step) in steps.iter().enumerate() {
        let res = match *step {
            Step::On(n) => registry.activate(n),
            Step::Off(n) => registry.deactivate(n),
            Step::Clear(n) => registry.clear(n),
            Step::Undo => {
                registry.undo_last();
                Ok(())
            }
        };
        res.map_err(|e| anyhow!("step {} ({step}): {e}", i + 1))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use command_registry::RemoteConfig;

    #[test]
    fn test_parse_steps() {
        let raw: Vec<String> = ["on:2", "OFF: 4", "undo", "clear:0"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let steps = parse_steps(&raw).unwrap();
        assert_eq!(
            steps,
            vec![Step::On(2), Step::Off(4), Step::Undo, Step::Clear(0)]
        );
        assert_eq!(steps[1].to_string(), "off:4");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("press".parse::<Step>().is_err());
        assert!("on:x".parse::<Step>().is_err());
        assert!("toggle:1".parse::<Step>().is_err());
        assert!("on:-1".parse::<Step>().is_err());
    }

    #[test]
    fn test_apply_runs_demo_script() {
        let mut remote = RemoteConfig::demo().unwrap().build().unwrap();
        let steps = vec![Step::On(2), Step::On(4), Step::Off(2), Step::Undo];
        apply(&mut remote.registry, &steps).unwrap();
        assert!(remote.devices.light("light").unwrap().is_on());
        assert_eq!(
            remote.registry.last_invoked().label(),
            "LightOffCommand"
        );
    }

    #[test]
    fn test_apply_stops_at_bad_slot() {
        let mut remote = RemoteConfig::demo().unwrap().build().unwrap();
        let steps = vec![Step::On(2), Step::On(9), Step::Off(2)];
        let err = apply(&mut remote.registry, &steps).unwrap_err();
        assert!(err.to_string().contains("step 2 (on:9)"));
        assert!(remote.devices.light("light").unwrap().is_on());
    }
}
