use std::time::Duration;

use clap::{Parser, ValueEnum};

use tickface_clock::{AnimationCurve, FaceConfig};

#[derive(Parser, Debug, PartialEq)]
#[command(name = "tickface")]
#[command(about = "Analog watch face with a sweeping second hand")]
pub struct CliArgs {
    /// Window width in logical pixels
    #[arg(long, default_value_t = 180.0)]
    pub width: f64,

    /// Window height in logical pixels
    #[arg(long, default_value_t = 180.0)]
    pub height: f64,

    /// Window title
    #[arg(long, default_value = "tickface")]
    pub title: String,

    /// Duration of the second-hand sweep in milliseconds
    #[arg(long, default_value_t = 500)]
    pub sweep_ms: u64,

    /// Timing curve of the sweep
    #[arg(long, value_enum, default_value_t = CurveArg::EaseInOut)]
    pub curve: CurveArg,

    /// Log filter in env_logger syntax (falls back to RUST_LOG)
    #[arg(long)]
    pub log: Option<String>,
}

#[derive(ValueEnum, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CurveArg {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl From<CurveArg> for AnimationCurve {
    fn from(c: CurveArg) -> Self {
        match c {
            CurveArg::Linear => AnimationCurve::Linear,
            CurveArg::EaseIn => AnimationCurve::EaseIn,
            CurveArg::EaseOut => AnimationCurve::EaseOut,
            CurveArg::EaseInOut => AnimationCurve::EaseInOut,
        }
    }
}

impl CliArgs {
    pub fn face_config(&self) -> FaceConfig {
        FaceConfig {
            sweep_duration: Duration::from_millis(self.sweep_ms),
            sweep_curve: self.curve.into(),
            ..FaceConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args() {
        let args = CliArgs::parse_from(["tickface"]);
        assert_eq!(args.width, 180.0);
        assert_eq!(args.height, 180.0);
        assert_eq!(args.title, "tickface");
        assert_eq!(args.sweep_ms, 500);
        assert_eq!(args.curve, CurveArg::EaseInOut);
        assert_eq!(args.log, None);
    }

    #[test]
    fn test_cli_parse_window_size() {
        let args = CliArgs::parse_from(["tickface", "--width", "144", "--height", "168"]);
        assert_eq!(args.width, 144.0);
        assert_eq!(args.height, 168.0);
    }

    #[test]
    fn test_cli_parse_sweep() {
        let args = CliArgs::parse_from([
            "tickface",
            "--sweep-ms", "250",
            "--curve", "ease-out",
            "--log", "tickface_clock=trace",
        ]);
        let cfg = args.face_config();
        assert_eq!(cfg.sweep_duration, Duration::from_millis(250));
        assert_eq!(cfg.sweep_curve, AnimationCurve::EaseOut);
        assert_eq!(args.log.as_deref(), Some("tickface_clock=trace"));
    }

    #[test]
    fn test_cli_rejects_unknown_curve() {
        assert!(CliArgs::try_parse_from(["tickface", "--curve", "bounce"]).is_err());
    }

    #[test]
    fn test_face_config_keeps_geometry_defaults() {
        let cfg = CliArgs::parse_from(["tickface"]).face_config();
        assert_eq!(cfg, FaceConfig::default());
    }
}
