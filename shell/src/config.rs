/// Presentation settings for a session.
///
/// There is no configuration file; the binary fills this in from its
/// command-line flags and tests build it directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Text printed before every input line.
    pub prompt: String,
    /// Print the version banner when the session starts.
    pub banner: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: ">> ".to_string(),
            banner: true,
        }
    }
}

impl Config {
    /// No prompt and no banner, so the output holds only instruction results.
    pub fn silent() -> Self {
        Self {
            prompt: String::new(),
            banner: false,
        }
    }
}
