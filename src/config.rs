/// Session settings, filled from CLI flags by the binary.
#[derive(Debug, Clone)]
pub struct Config {
    /// Deepest allowed nesting of evaluation steps before the run is
    /// aborted as a stack overflow.
    pub max_depth: usize,
    /// Print diagnostics to stderr as they are raised. Embedders and tests
    /// turn this off and read [`crate::Evaluator::diagnostics`] instead.
    pub echo_diagnostics: bool,
    /// Global name that receives the trailing command-line arguments.
    pub args_binding: String,
}

impl Config {
    /// Fits an ordinary 8 MiB native stack. Hosts that run the evaluator on
    /// a larger stack can raise it with [`Config::with_max_depth`].
    pub const DEFAULT_MAX_DEPTH: usize = 1_000;

    /// Default settings with diagnostics kept in memory only.
    pub fn quiet() -> Self {
        Self {
            echo_diagnostics: false,
            ..Self::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            echo_diagnostics: true,
            args_binding: "args".to_string(),
        }
    }
}
