//! `.env` loading for `ResumeConfig::from_env`
//!
//! Kept in its own test binary: it changes the working directory and
//! process environment.

use pretty_assertions::assert_eq;
use resume::ResumeConfig;
use std::time::Duration;

#[test]
fn test_from_env_reads_dotenv_file() {
    let dir = std::env::temp_dir().join(format!("resume-dotenv-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join(".env"),
        "RESUME_FETCH_TIMEOUT_SECS=4\nRESUME_USER_AGENT=from-dotenv/1\nRESUME_COMPRESS=true\n",
    )
    .unwrap();

    // Variables already in the environment win over the file
    std::env::set_var("RESUME_COMPRESS", "false");
    std::env::set_current_dir(&dir).unwrap();

    let config = ResumeConfig::from_env().unwrap();
    std::fs::remove_dir_all(&dir).ok();

    assert_eq!(
        config,
        ResumeConfig {
            fetch_timeout: Duration::from_secs(4),
            user_agent: "from-dotenv/1".to_string(),
            compress: false,
        }
    );
}
