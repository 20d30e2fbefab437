use crate::prelude::{eprintln, println, *};
use crate::service::{FizzBuzzService, GenerationService, StatisticsService};
use fizzbuzz_core::fingerprint::ParameterSet;
use fizzbuzz_core::sequence::FizzBuzzResult;
use fizzbuzz_core::validation::validate;
use serde_json::json;

#[derive(Debug, clap::Args)]
#[command(about = "Print the sequence for the given parameters")]
pub struct App {
    /// First divisor
    #[arg(allow_negative_numbers = true)]
    int1: i64,

    /// Second divisor
    #[arg(allow_negative_numbers = true)]
    int2: i64,

    /// Upper bound of the sequence (inclusive)
    #[arg(allow_negative_numbers = true)]
    limit: i64,

    /// Replacement for multiples of int1
    str1: String,

    /// Replacement for multiples of int2
    str2: String,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Count this request in the statistics file
    #[arg(long)]
    record: bool,
}

impl App {
    /// Parameters checked with the same rules as the HTTP API.
    fn parameters(&self) -> Result<ParameterSet, Error> {
        let data = json!({
            "int1": self.int1,
            "int2": self.int2,
            "limit": self.limit,
            "str1": self.str1,
            "str2": self.str2,
        });

        let data = data.as_object().cloned().unwrap_or_default();
        validate(&data).map_err(Error::InvalidParameters)
    }
}

pub async fn run(app: App, global: crate::Global) -> Result<()> {
    let params = app.parameters()?;

    let result = if app.record {
        let statistics = StatisticsService::open(global.stats_file.clone(), global.cache_ttl());
        let service = FizzBuzzService::new(statistics);

        let result = tokio::task::spawn_blocking(move || service.process_and_record(&params))
            .await
            .map_err(Error::from)??;

        if global.verbose {
            eprintln!("Recorded request in {}", global.stats_file.display());
        }

        result
    } else {
        GenerationService.process_params(&params)
    };

    if app.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", format_items(&result));
    }

    Ok(())
}

fn format_items(result: &FizzBuzzResult) -> String {
    result.items().join("\n")
}
