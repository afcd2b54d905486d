use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Gravity period before the mode's fall-speed divisor is applied.
    pub base_period: Duration,
    pub highscore_path: PathBuf,
    pub static_dir: PathBuf,
    /// Seeds every session RNG when set; otherwise entropy per session.
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_period: Duration::from_millis(600),
            highscore_path: PathBuf::from("highscores.json"),
            static_dir: PathBuf::from("frontend"),
            seed: None,
        }
    }
}
