//! Per-country vulnerability ranking over normalized indicators.

use super::Dataset;

/// Indicators that feed the vulnerability ranking, when present.
pub const VULN_INDICATORS: &[&str] = &[
	"Total Damage, Adjusted ('000 US$)",
	"No. Affected",
	"Total Deaths",
	"GDP growth (annual %)",
	"Inflation, consumer prices (annual %)",
	"ShockImpact",
	"ResilienceScore",
];

const NORM_EPSILON: f64 = 1e-9;

/// Top `n` vulnerabilities for `iso3` in its latest year, as
/// `(indicator, normalized score)` pairs sorted descending.
///
/// Each indicator is min-max normalized across the whole dataset before
/// ranking, so scores are comparable across indicators. Empty when the
/// country is absent or reports none of the indicators.
pub fn top_vulnerabilities(data: &Dataset, iso3: &str, n: usize) -> Vec<(String, f64)> {
	let Some(record) = data.record_for(iso3, None) else {
		return Vec::new();
	};

	let mut scores: Vec<(String, f64)> = Vec::new();
	for (idx, name) in data.indicator_columns().iter().enumerate() {
		if !VULN_INDICATORS.contains(&name.as_str()) {
			continue;
		}
		let Some(value) = record.indicator(idx) else {
			continue;
		};
		let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
		for row in data.records() {
			if let Some(v) = row.indicator(idx) {
				min = min.min(v);
				max = max.max(v);
			}
		}
		let score = (value - min) / (max - min + NORM_EPSILON);
		scores.push((name.clone(), score));
	}

	scores.sort_by(|a, b| b.1.total_cmp(&a.1));
	scores.truncate(n);
	scores
}

#[cfg(test)]
mod tests {
	use super::*;

	const SAMPLE: &str = "\
ISO3,Year,ShockImpact,ResilienceScore,Total Deaths,BET_Export
ALP,2019,0.2,0.9,10,100
ALP,2020,0.8,0.3,50,120
BET,2020,0.4,0.6,,40
";

	#[test]
	fn ranks_latest_year_descending() {
		let ds = Dataset::from_csv_str(SAMPLE).unwrap();
		let top = top_vulnerabilities(&ds, "ALP", 3);
		assert_eq!(top.len(), 3);
		// ALP's 2020 row has the dataset maximum for ShockImpact and
		// Total Deaths, the minimum for ResilienceScore.
		assert!((top[0].1 - top[1].1).abs() < 1e-6);
		assert!(top[0].1 > 0.99);
		assert!(top[2].1 < 0.01);
		assert_eq!(top[2].0, "ResilienceScore");
	}

	#[test]
	fn missing_indicator_values_are_skipped() {
		let ds = Dataset::from_csv_str(SAMPLE).unwrap();
		let top = top_vulnerabilities(&ds, "BET", 5);
		assert_eq!(top.len(), 2);
		assert!(top.iter().all(|(name, _)| name != "Total Deaths"));
	}

	#[test]
	fn unknown_country_yields_nothing() {
		let ds = Dataset::from_csv_str(SAMPLE).unwrap();
		assert!(top_vulnerabilities(&ds, "ZZZ", 3).is_empty());
	}
}
