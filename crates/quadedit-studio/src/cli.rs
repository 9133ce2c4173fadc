use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[command(name = "quadedit", version, about = "Interactive quad editor", long_about = None)]
pub struct Arguments {
    /// Scene file (TOML). The built-in 3×3 grid is used when omitted
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub scene: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `quadedit_editor=trace`. Overrides RUST_LOG
    #[arg(long)]
    pub log: Option<String>,

    /// Present without waiting for vertical sync
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub no_vsync: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn defaults() {
        let args = Arguments::try_parse_from(["quadedit"]).unwrap();
        assert!(args.scene.is_none());
        assert!(args.log.is_none());
        assert!(!args.no_vsync);
    }

    #[test]
    fn all_flags() {
        let args = Arguments::try_parse_from([
            "quadedit",
            "--scene",
            "scenes/star.toml",
            "--log",
            "debug",
            "--no-vsync",
        ])
        .unwrap();
        assert_eq!(args.scene, Some(PathBuf::from("scenes/star.toml")));
        assert_eq!(args.log.as_deref(), Some("debug"));
        assert!(args.no_vsync);
    }

    #[test]
    fn rejects_unknown_flag() {
        assert!(Arguments::try_parse_from(["quadedit", "--fullscreen"]).is_err());
    }
}
