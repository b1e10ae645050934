/// How the console renders results.
#[derive(Debug, Clone)]
pub struct DisplayOptions {
    pub enable_color: bool,
    pub json: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            json: false,
        }
    }
}
