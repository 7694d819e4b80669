use std::collections::HashSet;
use std::io::Read;

use log::warn;
use thiserror::Error;

/// Errors surfaced while ingesting the dataset CSV.
#[derive(Debug, Error)]
pub enum DataError {
	#[error("failed to read dataset csv: {0}")]
	Csv(#[from] csv::Error),
	#[error("dataset is missing required column `{0}`")]
	MissingColumn(&'static str),
}

/// Direction of a bilateral trade flow column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowDirection {
	Export,
	Import,
}

impl FlowDirection {
	/// Split a header like `CHN_Export` into `("CHN", Export)`.
	///
	/// Only the final `_Export`/`_Import` suffix is significant, so partner
	/// codes may themselves contain underscores. Headers without a
	/// recognized suffix are not flow columns.
	fn parse_header(header: &str) -> Option<(&str, FlowDirection)> {
		let (partner, suffix) = header.rsplit_once('_')?;
		if partner.is_empty() {
			return None;
		}
		match suffix {
			"Export" => Some((partner, FlowDirection::Export)),
			"Import" => Some((partner, FlowDirection::Import)),
			_ => None,
		}
	}
}

#[derive(Clone, Debug)]
struct FlowColumn {
	partner: String,
	direction: FlowDirection,
}

/// One (country, year) observation.
#[derive(Clone, Debug)]
pub struct Record {
	pub iso3: String,
	pub year: i32,
	flows: Vec<Option<f64>>,
	indicators: Vec<Option<f64>>,
}

impl Record {
	/// Value of the indicator column at `idx`, if present.
	pub fn indicator(&self, idx: usize) -> Option<f64> {
		self.indicators.get(idx).copied().flatten()
	}
}

/// The full dataset, with the flow-column schema parsed once at ingestion.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
	flow_columns: Vec<FlowColumn>,
	indicator_columns: Vec<String>,
	records: Vec<Record>,
}

impl Dataset {
	/// Parse a dataset from CSV text.
	pub fn from_csv_str(text: &str) -> Result<Self, DataError> {
		Self::from_reader(text.as_bytes())
	}

	/// Parse a dataset from any CSV reader.
	///
	/// Requires `ISO3` and `Year` columns. Every `<code>_Export` /
	/// `<code>_Import` column becomes part of the bilateral flow schema;
	/// every remaining column is kept as a named numeric indicator. Cells
	/// that fail numeric parse become missing values; rows without a usable
	/// ISO3 or year are skipped.
	pub fn from_reader<R: Read>(reader: R) -> Result<Self, DataError> {
		let mut rdr = csv::ReaderBuilder::new()
			.flexible(true)
			.from_reader(reader);
		let headers = rdr.headers()?.clone();

		let iso3_idx = headers
			.iter()
			.position(|h| h == "ISO3")
			.ok_or(DataError::MissingColumn("ISO3"))?;
		let year_idx = headers
			.iter()
			.position(|h| h == "Year")
			.ok_or(DataError::MissingColumn("Year"))?;

		// Classify the remaining headers in first-seen order. That order is
		// load-bearing: partner ranking ties break on it.
		let mut flow_columns = Vec::new();
		let mut flow_indices = Vec::new();
		let mut indicator_columns = Vec::new();
		let mut indicator_indices = Vec::new();
		for (idx, header) in headers.iter().enumerate() {
			if idx == iso3_idx || idx == year_idx {
				continue;
			}
			if let Some((partner, direction)) = FlowDirection::parse_header(header) {
				flow_columns.push(FlowColumn {
					partner: partner.to_string(),
					direction,
				});
				flow_indices.push(idx);
			} else {
				indicator_columns.push(header.to_string());
				indicator_indices.push(idx);
			}
		}

		let mut records = Vec::new();
		for (row_no, result) in rdr.records().enumerate() {
			let row = result?;
			let iso3 = row.get(iso3_idx).unwrap_or("").trim();
			let year = row.get(year_idx).and_then(parse_year);
			let (iso3, year) = match (iso3.is_empty(), year) {
				(false, Some(year)) => (iso3.to_string(), year),
				_ => {
					warn!("skipping dataset row {} without ISO3/Year", row_no + 1);
					continue;
				}
			};

			let flows = flow_indices
				.iter()
				.map(|&idx| row.get(idx).and_then(parse_value))
				.collect();
			let indicators = indicator_indices
				.iter()
				.map(|&idx| row.get(idx).and_then(parse_value))
				.collect();
			records.push(Record {
				iso3,
				year,
				flows,
				indicators,
			});
		}

		Ok(Self {
			flow_columns,
			indicator_columns,
			records,
		})
	}

	/// All records in file order.
	pub fn records(&self) -> &[Record] {
		&self.records
	}

	/// Indicator column names in file order.
	pub fn indicator_columns(&self) -> &[String] {
		&self.indicator_columns
	}

	/// Sorted, de-duplicated country codes.
	pub fn countries(&self) -> Vec<&str> {
		let mut seen = HashSet::new();
		let mut out: Vec<&str> = self
			.records
			.iter()
			.map(|r| r.iso3.as_str())
			.filter(|c| seen.insert(*c))
			.collect();
		out.sort_unstable();
		out
	}

	/// Sorted, de-duplicated years available for one country.
	pub fn years_for(&self, iso3: &str) -> Vec<i32> {
		let mut years: Vec<i32> = self
			.records
			.iter()
			.filter(|r| r.iso3 == iso3)
			.map(|r| r.year)
			.collect();
		years.sort_unstable();
		years.dedup();
		years
	}

	/// Inclusive (min, max) year span across the dataset.
	pub fn year_range(&self) -> Option<(i32, i32)> {
		let min = self.records.iter().map(|r| r.year).min()?;
		let max = self.records.iter().map(|r| r.year).max()?;
		Some((min, max))
	}

	/// Number of columns in the source file, ISO3 and Year included.
	pub fn column_count(&self) -> usize {
		2 + self.flow_columns.len() + self.indicator_columns.len()
	}

	/// The record for `(iso3, year)`, or the chronologically latest record
	/// for `iso3` when `year` is `None`. Later file rows win on a year tie.
	pub fn record_for(&self, iso3: &str, year: Option<i32>) -> Option<&Record> {
		let mut rows = self.records.iter().filter(|r| r.iso3 == iso3);
		match year {
			Some(year) => rows.find(|r| r.year == year),
			None => {
				let mut best: Option<&Record> = None;
				for row in rows {
					if best.is_none_or(|b| row.year >= b.year) {
						best = Some(row);
					}
				}
				best
			}
		}
	}

	/// Visit a record's bilateral flows as `(partner, direction, value)`
	/// in first-seen column order. Missing cells are skipped.
	pub fn flows_of<'a>(
		&'a self,
		record: &'a Record,
	) -> impl Iterator<Item = (&'a str, FlowDirection, f64)> + 'a {
		self.flow_columns
			.iter()
			.zip(&record.flows)
			.filter_map(|(col, value)| {
				value.map(|v| (col.partner.as_str(), col.direction, v))
			})
	}
}

fn parse_value(cell: &str) -> Option<f64> {
	let cell = cell.trim();
	if cell.is_empty() {
		return None;
	}
	cell.parse::<f64>().ok()
}

/// Years exported from pandas frequently arrive as `2020.0`.
fn parse_year(cell: &str) -> Option<i32> {
	let value = parse_value(cell)?;
	if !value.is_finite() {
		return None;
	}
	Some(value.round() as i32)
}

#[cfg(test)]
mod tests {
	use super::*;

	const SAMPLE: &str = "\
ISO3,Year,BET_Export,BET_Import,GAM_Export,GDP growth (annual %),Comment
ALP,2018.0,90,40,5,2.1,steady
ALP,2020,100,50,0,3.4,rebound
BET,2020,,,,1.0,
";

	#[test]
	fn parses_flow_schema_and_indicators() {
		let ds = Dataset::from_csv_str(SAMPLE).unwrap();
		assert_eq!(ds.records().len(), 3);
		assert_eq!(ds.flow_columns.len(), 3);
		// Non-numeric columns land in the indicator list by name.
		assert_eq!(
			ds.indicator_columns(),
			&["GDP growth (annual %)".to_string(), "Comment".to_string()]
		);
		assert_eq!(ds.column_count(), 7);
	}

	#[test]
	fn header_suffix_parsing() {
		assert_eq!(
			FlowDirection::parse_header("CHN_Export"),
			Some(("CHN", FlowDirection::Export))
		);
		assert_eq!(
			FlowDirection::parse_header("EU_27_Import"),
			Some(("EU_27", FlowDirection::Import))
		);
		assert_eq!(FlowDirection::parse_header("CHN_Trade"), None);
		assert_eq!(FlowDirection::parse_header("_Export"), None);
		assert_eq!(FlowDirection::parse_header("ShockImpact"), None);
	}

	#[test]
	fn float_years_round_to_integers() {
		let ds = Dataset::from_csv_str(SAMPLE).unwrap();
		assert_eq!(ds.years_for("ALP"), vec![2018, 2020]);
	}

	#[test]
	fn non_numeric_cells_become_missing() {
		let ds = Dataset::from_csv_str(SAMPLE).unwrap();
		let rec = ds.record_for("BET", Some(2020)).unwrap();
		assert_eq!(ds.flows_of(rec).count(), 0);
		assert_eq!(rec.indicator(0), Some(1.0));
		assert_eq!(rec.indicator(1), None);
	}

	#[test]
	fn latest_record_selection() {
		let ds = Dataset::from_csv_str(SAMPLE).unwrap();
		assert_eq!(ds.record_for("ALP", None).unwrap().year, 2020);
		assert_eq!(ds.record_for("ALP", Some(2018)).unwrap().year, 2018);
		assert!(ds.record_for("ALP", Some(1999)).is_none());
		assert!(ds.record_for("ZZZ", None).is_none());
	}

	#[test]
	fn countries_sorted_unique() {
		let ds = Dataset::from_csv_str(SAMPLE).unwrap();
		assert_eq!(ds.countries(), vec!["ALP", "BET"]);
		assert_eq!(ds.year_range(), Some((2018, 2020)));
	}

	#[test]
	fn missing_required_column_is_an_error() {
		let err = Dataset::from_csv_str("ISO3,BET_Export\nALP,1\n").unwrap_err();
		assert!(matches!(err, DataError::MissingColumn("Year")));
	}

	#[test]
	fn rows_without_year_are_skipped() {
		let ds = Dataset::from_csv_str("ISO3,Year\nALP,\nALP,2020\n").unwrap();
		assert_eq!(ds.records().len(), 1);
	}
}
