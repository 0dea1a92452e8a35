/// A complete "create and run" call for one named container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub name: String,
    pub options: Vec<String>,
    pub image: String,
}

impl RunRequest {
    pub fn new(name: &str, options: Vec<String>, image: &str) -> Self {
        Self {
            name: name.to_string(),
            options,
            image: image.to_string(),
        }
    }

    /// Engine arguments: `run -d --name <name> <options...> <image>`.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "run".to_string(),
            "-d".to_string(),
            "--name".to_string(),
            self.name.clone(),
        ];
        args.extend(self.options.iter().cloned());
        args.push(self.image.clone());
        args
    }
}
