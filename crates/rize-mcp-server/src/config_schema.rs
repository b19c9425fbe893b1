//! Prints the JSON schema of the server's YAML configuration file

use rize_mcp_server::runtime::Config;
use schemars::schema_for;

fn main() -> anyhow::Result<()> {
    let schema = schema_for!(Config);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
