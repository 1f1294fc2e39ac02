//! Remote exec configuration.

/// Default shell started in the container.
pub const DEFAULT_SHELL: &str = "/bin/bash";

/// Default container CLI.
pub const DEFAULT_DOCKER_BINARY: &str = "docker";

/// What to run and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecConfig {
    /// Container id or name.
    pub container: String,

    /// Shell to start (default: `/bin/bash`).
    pub shell: String,

    /// User to run the shell as. `None` uses the image default.
    pub user: Option<String>,

    /// Container CLI binary (default: `docker`).
    pub docker_binary: String,

    /// Terminal width for the PTY.
    pub terminal_width: u16,

    /// Terminal height for the PTY.
    pub terminal_height: u16,
}

impl ExecConfig {
    /// Create a configuration for `container` with default settings.
    pub fn new(container: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            shell: DEFAULT_SHELL.to_string(),
            user: None,
            docker_binary: DEFAULT_DOCKER_BINARY.to_string(),
            terminal_width: 80,
            terminal_height: 24,
        }
    }

    /// Set the shell.
    pub fn shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Set the user. An empty name means the image default.
    pub fn user(mut self, user: impl Into<String>) -> Self {
        let user = user.into();
        self.user = if user.is_empty() { None } else { Some(user) };
        self
    }

    /// Set the container CLI binary.
    pub fn docker_binary(mut self, binary: impl Into<String>) -> Self {
        self.docker_binary = binary.into();
        self
    }

    /// Set terminal dimensions.
    pub fn terminal_size(mut self, width: u16, height: u16) -> Self {
        self.terminal_width = width;
        self.terminal_height = height;
        self
    }

    /// Arguments passed to the container CLI.
    pub fn exec_args(&self) -> Vec<String> {
        let mut args = vec!["exec".to_string(), "-i".to_string(), "-t".to_string()];
        if let Some(user) = &self.user {
            args.push("-u".to_string());
            args.push(user.clone());
        }
        args.push(self.container.clone());
        args.push(self.shell.clone());
        args
    }
}
