#[derive(Debug, clap::Args)]
pub struct ServeOptions {
    /// Port to listen on
    #[arg(short, long, env = "FIZZBUZZ_PORT", default_value = "8000")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, env = "FIZZBUZZ_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Runtime environment; `dev` adds debug details to internal error responses
    #[arg(long = "env", env = "FIZZBUZZ_ENV", value_enum, default_value = "prod")]
    pub environment: Environment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Environment {
    Dev,
    #[default]
    Prod,
}

impl Environment {
    pub fn is_dev(self) -> bool {
        self == Environment::Dev
    }
}
