//! Schema command - print expected input and output formats

use clap::Args;
use propdep::core::{DepreciationRequest, DepreciationResponse};
use propdep::import::AssetRecord;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the request
    JsonSchema,
    /// JSON Schema for the calculated schedule
    ResponseSchema,
    /// CSV header row for the asset file
    CsvHeader,
    /// Asset CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => {
                let schema = schema_for!(DepreciationRequest);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::ResponseSchema => {
                let schema = schema_for!(DepreciationResponse);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::CsvHeader => println!("{}", AssetRecord::csv_header()),
            SchemaFormat::CsvFields => self.print_csv_fields(),
        }
        Ok(())
    }

    fn print_csv_fields(&self) {
        println!("Asset CSV Format");
        println!("================");
        println!();
        for field in AssetRecord::csv_schema() {
            let req = if field.required { "required" } else { "optional" };
            println!("{:16} ({:8})  {}", field.name, req, field.description);
        }
        println!();
        println!("category is plant_equipment or capital_works; values are in dollars");
    }
}
