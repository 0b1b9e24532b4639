use std::sync::OnceLock;

pub const DEFAULT_LOOP_VAR_PREFIX: &str = "tmp_parfor_";

fn env_true(key: &str) -> Option<bool> {
    std::env::var(key).ok().map(|val| {
        let trimmed = val.trim();
        !trimmed.is_empty() && !matches!(trimmed, "0" | "false" | "FALSE" | "False")
    })
}

fn env_prefix() -> Option<&'static str> {
    static PREFIX: OnceLock<Option<String>> = OnceLock::new();
    PREFIX
        .get_or_init(|| {
            std::env::var("FERROFORT_LOOP_VAR_PREFIX")
                .ok()
                .map(|val| val.trim().to_string())
                .filter(|val| !val.is_empty())
        })
        .as_deref()
}

/// Knobs for one lowering run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoweringOptions {
    /// Prefix of generated loop-variable names; the counter value is appended.
    pub loop_var_prefix: String,
    /// Emit an `INTEGER` declaration for every generated loop variable.
    pub declare_loop_vars: bool,
    /// First counter value handed out.
    pub start_counter: usize,
}

impl Default for LoweringOptions {
    fn default() -> Self {
        Self {
            loop_var_prefix: DEFAULT_LOOP_VAR_PREFIX.to_string(),
            declare_loop_vars: true,
            start_counter: 0,
        }
    }
}

impl LoweringOptions {
    /// Defaults overridden by `FERROFORT_LOOP_VAR_PREFIX` and
    /// `FERROFORT_DECLARE_LOOP_VARS`.
    pub fn from_env() -> Self {
        let mut options = Self::default();
        if let Some(prefix) = env_prefix() {
            options.loop_var_prefix = prefix.to_string();
        }
        if let Some(declare) = env_true("FERROFORT_DECLARE_LOOP_VARS") {
            options.declare_loop_vars = declare;
        }
        options
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.loop_var_prefix = prefix.into();
        self
    }

    pub fn without_loop_var_decls(mut self) -> Self {
        self.declare_loop_vars = false;
        self
    }

    pub fn loop_var_name(&self, n: usize) -> String {
        format!("{}{}", self.loop_var_prefix, n)
    }
}
