// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Integration Tests: Settings Files
//!
//! Loads JSON5 settings from disk and checks the resulting logger.

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use levelog::{ConfigError, Level, LevelSpec, Logger, Mode, Settings, Stream};

    #[test]
    fn test_load_and_apply_settings_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let log_path = dir.path().join("out/app.log");
        let settings_path = dir.path().join("logging.json5");
        std::fs::write(
            &settings_path,
            format!(
                r#"{{
                    // everything goes to the file only
                    mode: "writer",
                    timestamp: false,
                    line_trace: "off",
                    file: {:?},
                    pool_prewarm: 4,
                    levels: [
                        {{ tag: "audit", mode: "writer" }},
                    ],
                }}"#,
                log_path.display().to_string()
            ),
        )?;

        let settings = Settings::load_from_file(&settings_path)?;
        let logger = Logger::from_settings(&settings)?;

        logger.info("hello")?;
        levelog::log_custom!(logger, "AUDIT", "user={}", "bob")?;

        assert_eq!(std::fs::read_to_string(&log_path)?, "[INFO]:\thello\n[AUDIT]:\tuser=bob\n");
        assert_eq!(logger.pool_stats().idle, 4);
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let path = std::path::Path::new("/nonexistent/levelog.json5");
        let err = Settings::load_from_file(path).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(..)));
    }

    #[test]
    fn test_invalid_settings_are_not_applied() {
        let settings = Settings::parse(r#"{ mode: "none", levels: [{ tag: "warn" }] }"#).unwrap();
        let logger = Logger::new();

        let err = settings.apply(&logger).unwrap_err();
        assert_eq!(
            err,
            ConfigError::ReservedTag {
                tag: "WARN".to_string()
            }
        );
        assert_eq!(logger.current_mode(Level::INFO), Mode::Std);
    }

    #[test]
    fn test_unopenable_file_leaves_logger_unchanged() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "plain file")?;

        let settings = Settings {
            mode: Some(Mode::None),
            color: Some(false),
            file: Some(blocker.join("app.log")),
            levels: vec![LevelSpec {
                tag: "AUDIT".to_string(),
                mode: Mode::Std,
                color: false,
                stream: Stream::Stdout,
            }],
            ..Default::default()
        };
        let logger = Logger::new();

        let log_path = blocker.join("app.log");
        let err = settings.apply(&logger).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(ref path, _) if path == &log_path));
        assert_eq!(logger.current_mode(Level::INFO), Mode::Std);
        assert!(logger.config(Level::INFO).unwrap().color_enabled());
        assert_eq!(logger.tag_to_level("AUDIT"), Level::UNKNOWN);
        Ok(())
    }
}
