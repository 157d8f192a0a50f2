//! Shared utility functions for CTRE crates.

/// Dollar formatting used by axis ticks and summaries
pub mod format {
    /// Compact currency: `$1.2M`, `$120k`, `$500`.
    pub fn format_currency(value: f64) -> String {
        if value >= 1_000_000.0 {
            format!("${:.1}M", value / 1_000_000.0)
        } else if value >= 1000.0 {
            format!("${:.0}k", value / 1000.0)
        } else {
            format!("${}", value)
        }
    }

    /// Assessed-value axis tick: `0`, `200k`, `1.2M`.
    pub fn format_assessed_tick(value: f64) -> String {
        if value >= 1_000_000.0 {
            format!("{}M", value / 1_000_000.0)
        } else if value > 0.0 {
            format!("{}k", value / 1000.0)
        } else {
            "0".to_string()
        }
    }

    const SI_PREFIXES: [&str; 17] = [
        "y", "z", "a", "f", "p", "n", "µ", "m", "", "K", "M", "B", "T", "P", "E", "Z", "Y",
    ];

    /// Sale-value axis tick: one significant digit with an SI suffix, using
    /// `K` for thousands and `B` for billions (`$3M`, `$500K`, `$1B`).
    pub fn format_sale_tick(value: f64) -> String {
        if value == 0.0 || !value.is_finite() {
            return "$0".to_string();
        }
        let sign = if value < 0.0 { "-" } else { "" };
        let magnitude = value.abs();

        let mut exponent = magnitude.log10().floor() as i32;
        let mut digit = (magnitude / 10f64.powi(exponent) + 0.5).floor() as i64;
        if digit >= 10 {
            digit = 1;
            exponent += 1;
        }
        if digit < 1 {
            digit = 1;
        }

        let group = exponent.div_euclid(3).clamp(-8, 8);
        let shift = exponent - group * 3;
        let mantissa = digit as f64 * 10f64.powi(shift);
        let prefix = SI_PREFIXES[(group + 8) as usize];
        format!("{}${}{}", sign, mantissa, prefix)
    }

}

/// Output file naming
pub mod naming {
    /// Default converter output name (without extension), e.g.
    /// `filtered_data_west_hartford_2018_max`.
    pub fn default_output_name(
        town: Option<&str>,
        start_year: Option<i32>,
        end_year: Option<i32>,
    ) -> String {
        let mut name = String::from("filtered_data");
        if let Some(town) = town {
            name.push('_');
            name.push_str(&town.to_lowercase().replace(' ', "_"));
        }
        if start_year.is_some() || end_year.is_some() {
            let start = start_year.map_or_else(|| "min".to_string(), |y| y.to_string());
            let end = end_year.map_or_else(|| "max".to_string(), |y| y.to_string());
            name.push_str(&format!("_{}_{}", start, end));
        }
        name
    }

}
