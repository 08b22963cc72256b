use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How fast the host clock runs relative to real time. This only scales the frame times handed to
/// the session; playback itself doesn't know about it.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub enum SpeedSetting {
    /// 1 sim second per real second
    #[default]
    Realtime,
    /// 5 sim seconds per real second
    Fast,
    /// 30 sim seconds per real second
    Faster,
    /// 1 sim hour per real second
    Fastest,
}

impl SpeedSetting {
    pub fn multiplier(self) -> f64 {
        match self {
            SpeedSetting::Realtime => 1.0,
            SpeedSetting::Fast => 5.0,
            SpeedSetting::Faster => 30.0,
            SpeedSetting::Fastest => 3600.0,
        }
    }
}

impl FromStr for SpeedSetting {
    type Err = anyhow::Error;

    fn from_str(x: &str) -> anyhow::Result<Self> {
        match x.to_lowercase().as_str() {
            "realtime" | "1x" => Ok(SpeedSetting::Realtime),
            "fast" | "5x" => Ok(SpeedSetting::Fast),
            "faster" | "30x" => Ok(SpeedSetting::Faster),
            "fastest" | "3600x" => Ok(SpeedSetting::Fastest),
            _ => bail!("Unknown speed {x}; try realtime, fast, faster, or fastest"),
        }
    }
}

impl std::fmt::Display for SpeedSetting {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            SpeedSetting::Realtime => write!(f, "real-time speed"),
            SpeedSetting::Fast => write!(f, "5x speed"),
            SpeedSetting::Faster => write!(f, "30x speed"),
            SpeedSetting::Fastest => write!(f, "3600x speed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("realtime", SpeedSetting::Realtime)]
    #[case("5x", SpeedSetting::Fast)]
    #[case("Faster", SpeedSetting::Faster)]
    #[case("3600x", SpeedSetting::Fastest)]
    fn parse(#[case] raw: &str, #[case] expected: SpeedSetting) {
        assert_eq!(raw.parse::<SpeedSetting>().unwrap(), expected);
    }

    #[test]
    fn defaults_to_realtime() {
        assert_eq!(SpeedSetting::default(), SpeedSetting::Realtime);
        assert_eq!(SpeedSetting::default().multiplier(), 1.0);
    }

    #[test]
    fn parse_unknown() {
        assert!("warp".parse::<SpeedSetting>().is_err());
    }

    #[test]
    fn multipliers_increase() {
        let all = [
            SpeedSetting::Realtime,
            SpeedSetting::Fast,
            SpeedSetting::Faster,
            SpeedSetting::Fastest,
        ];
        for pair in all.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].multiplier() < pair[1].multiplier());
        }
    }
}
