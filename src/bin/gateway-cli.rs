use clap::{Parser, Subcommand};
use reqwest::Url;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Command-line client for the employee gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8111", env = "GATEWAY_URL")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every employee
    List,
    /// Fetch one employee by id
    Get { id: String },
    /// Case-insensitive name search
    Search { fragment: String },
    /// Highest salary on record
    HighestSalary,
    /// Names of the ten best paid employees
    TopTen,
    /// Create an employee
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        salary: i64,
        #[arg(long)]
        age: i64,
        #[arg(long)]
        title: String,
    },
    /// Delete an employee by id
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let request = match cli.command {
        Commands::List => client.get(endpoint(&cli.url, &[""])?),
        Commands::Get { id } => client.get(endpoint(&cli.url, &[&id])?),
        Commands::Search { fragment } => client.get(endpoint(&cli.url, &["search", &fragment])?),
        Commands::HighestSalary => client.get(endpoint(&cli.url, &["highestSalary"])?),
        Commands::TopTen => client.get(endpoint(&cli.url, &["topTenHighestEarningEmployeeNames"])?),
        Commands::Create {
            name,
            salary,
            age,
            title,
        } => client
            .post(endpoint(&cli.url, &[""])?)
            .json(&json!({"name": name, "salary": salary, "age": age, "title": title})),
        Commands::Delete { id } => client.delete(endpoint(&cli.url, &[&id])?),
    };

    print_response(request.send().await?).await
}

/// `base` plus `segments`, each encoded as a single path segment.
fn endpoint(base: &str, segments: &[&str]) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base)?;
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    Ok(url)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
