//! List command - show the operation catalog and what a selection expands to

use clap::{Args, ValueEnum};
use serde::Serialize;
use spvbake_core::prelude::*;

#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Pretty,
    /// JSON format for scripting
    Json,
}

#[derive(Args)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,

    /// Only list these operations or families, comma separated
    #[arg(short, long, value_name = "NAMES")]
    pub targets: Option<String>,

    /// Only list variants of this data type, by name (Float32) or DATA_TYPE_ID (2)
    #[arg(short, long, value_name = "DTYPE")]
    pub dtype: Option<String>,
}

#[derive(Serialize)]
struct OperationRow {
    name: &'static str,
    family: &'static str,
    template: TemplateKind,
    dtypes: Vec<DType>,
    artifacts: Vec<String>,
}

fn parse_dtype(value: &str) -> BakeResult<DType> {
    match value.parse::<u32>() {
        Ok(code) => DType::from_code(code),
        Err(_) => DType::from_name(value),
    }
}

/// Sub-catalog of the operations a listing covers.
fn select(catalog: &Catalog, targets: Option<&TargetFilter>, dtype: Option<DType>) -> BakeResult<Catalog> {
    let operations = catalog
        .operations()
        .iter()
        .filter(|op| targets.map_or(true, |t| t.matches(op)))
        .filter(|op| dtype.map_or(true, |d| op.dtypes.contains(&d)))
        .copied()
        .collect();
    Catalog::new(operations)
}

fn rows(catalog: &Catalog, dtype: Option<DType>) -> Vec<OperationRow> {
    catalog
        .operations()
        .iter()
        .map(|op| {
            let dtypes: Vec<DType> = op
                .dtypes
                .iter()
                .copied()
                .filter(|d| dtype.map_or(true, |only| *d == only))
                .collect();
            OperationRow {
                name: op.name,
                family: op.family,
                template: op.kind,
                artifacts: dtypes.iter().map(|d| BuildVariant::new(*op, *d).name()).collect(),
                dtypes,
            }
        })
        .collect()
}

pub fn execute(args: ListArgs) -> Result<(), Box<dyn std::error::Error>> {
    let targets = args.targets.as_deref().and_then(TargetFilter::parse);
    let dtype = args.dtype.as_deref().map(parse_dtype).transpose()?;
    let selection = select(&Catalog::builtin(), targets.as_ref(), dtype)?;
    let rows = rows(&selection, dtype);

    match args.format {
        OutputFormat::Pretty => print_pretty(&selection, &rows),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
    }

    Ok(())
}

fn print_pretty(selection: &Catalog, rows: &[OperationRow]) {
    println!("{:<16} {:<12} {:<8} DTYPES", "OPERATION", "FAMILY", "TEMPLATE");
    for row in rows {
        let dtypes: Vec<&str> = row.dtypes.iter().map(|d| d.name()).collect();
        println!(
            "{:<16} {:<12} {:<8} {}",
            row.name,
            row.family,
            row.template.to_string(),
            dtypes.join(", ")
        );
    }
    let variants: usize = rows.iter().map(|r| r.artifacts.len()).sum();
    println!();
    println!(
        "{} operations in {} families, {} variants",
        rows.len(),
        selection.families().len(),
        variants
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(targets: &str, dtype: Option<DType>) -> Vec<OperationRow> {
        let filter = TargetFilter::parse(targets);
        let selection = select(&Catalog::builtin(), filter.as_ref(), dtype).unwrap();
        rows(&selection, dtype)
    }

    #[test]
    fn test_rows_follow_catalog() {
        let rows = listing("", None);
        assert_eq!(rows.len(), 11);
        assert_eq!(rows[0].name, "Fill");
        assert_eq!(rows[0].artifacts.len(), 14);
        assert_eq!(rows[0].artifacts[1], "Fill-Float32");
    }

    #[test]
    fn test_rows_filtered_by_family() {
        let names: Vec<&str> = listing("Divide", None).iter().map(|r| r.name).collect();
        assert_eq!(names, ["DivideScalar", "Divide"]);
    }

    #[test]
    fn test_rows_filtered_by_dtype() {
        let rows = listing("", Some(DType::U8));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].artifacts, ["Fill-Uint8"]);

        let rows = listing("Add", Some(DType::I32));
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.dtypes == [DType::I32]));
    }

    #[test]
    fn test_selection_families() {
        let filter = TargetFilter::parse("Fill,MultiplyScalar,Multiply");
        let selection = select(&Catalog::builtin(), filter.as_ref(), None).unwrap();
        assert_eq!(selection.families(), ["Fill", "Multiply"]);
    }

    #[test]
    fn test_parse_dtype_by_name_or_code() {
        assert_eq!(parse_dtype("Float32").unwrap(), DType::F32);
        assert_eq!(parse_dtype("6").unwrap(), DType::I32);
        assert!(matches!(parse_dtype("Complex64"), Err(BakeError::UnknownDType(_))));
        assert!(matches!(parse_dtype("15"), Err(BakeError::UnknownDType(_))));
    }

    #[test]
    fn test_json_uses_type_names() {
        let json = serde_json::to_value(listing("Remainder", None)).unwrap();
        assert_eq!(json[0]["dtypes"][0], "Float16");
        assert_eq!(json[1]["artifacts"][6], "Remainder-Sint64");
    }
}
