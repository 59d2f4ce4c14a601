//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading tax tables
//! from YAML files.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::BracketTable;

use super::types::{
    CorporateRates, IndividualTaxConfig, IndividualTaxTables, Jurisdiction,
    SocialInsuranceDefaults, TaxTables, VatRates,
};

/// Loads tax tables from a directory of YAML files.
///
/// # Directory Structure
///
/// ```text
/// config/cn-2024/
/// ├── jurisdiction.yaml      # Table set metadata
/// ├── individual.yaml        # Basic deductions and progressive brackets
/// ├── vat.yaml               # VAT rate catalogue
/// ├── corporate.yaml         # Corporate income tax rates and tiers
/// └── social_insurance.yaml  # Default employee contribution rates
/// ```
///
/// Decimal values are written as quoted strings so they load exactly.
///
/// # Example
///
/// ```no_run
/// use tax_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/cn-2024").unwrap();
/// println!("Loaded tables: {}", loader.jurisdiction().name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    tables: TaxTables,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - Any required file is missing (`ConfigNotFound`)
    /// - Any file contains invalid YAML or an out-of-range rate (`ConfigParseError`)
    /// - A bracket table violates its invariants (`InvalidBracketTable`)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tax_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/cn-2024")?;
    /// # Ok::<(), tax_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let jurisdiction = Self::load_yaml::<Jurisdiction>(&path.join("jurisdiction.yaml"))?;

        let individual_path = path.join("individual.yaml");
        let individual_config = Self::load_yaml::<IndividualTaxConfig>(&individual_path)?;
        let individual = IndividualTaxTables {
            annual_basic_deduction: individual_config.annual_basic_deduction,
            monthly_basic_deduction: individual_config.monthly_basic_deduction,
            annual_brackets: BracketTable::new(individual_config.annual_brackets)?,
            monthly_brackets: BracketTable::new(individual_config.monthly_brackets)?,
        };

        let vat_path = path.join("vat.yaml");
        let vat = Self::load_yaml::<VatRates>(&vat_path)?;
        for (category, rate) in vat.all() {
            check_fraction(&vat_path, &format!("{:?}", category), rate)?;
        }

        let corporate_path = path.join("corporate.yaml");
        let corporate = Self::load_yaml::<CorporateRates>(&corporate_path)?;
        Self::check_corporate(&corporate_path, &corporate)?;

        let social_path = path.join("social_insurance.yaml");
        let social_insurance = Self::load_yaml::<SocialInsuranceDefaults>(&social_path)?;
        for (name, rate) in [
            ("pension", social_insurance.pension),
            ("medical", social_insurance.medical),
            ("unemployment", social_insurance.unemployment),
            ("housing_fund", social_insurance.housing_fund),
        ] {
            check_fraction(&social_path, name, rate)?;
        }

        debug!(
            code = %jurisdiction.code,
            version = %jurisdiction.version,
            path = %path.display(),
            "Loaded tax tables"
        );

        Ok(Self {
            tables: TaxTables::new(jurisdiction, individual, vat, corporate, social_insurance),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn check_corporate(path: &Path, rates: &CorporateRates) -> EngineResult<()> {
        for (name, rate) in [
            ("normal", rates.normal),
            ("high_tech", rates.high_tech),
            ("small_tier_1_rate", rates.small_tier_1_rate),
            ("small_tier_2_rate", rates.small_tier_2_rate),
        ] {
            check_fraction(path, name, rate)?;
        }

        if rates.small_tier_1_ceiling <= Decimal::ZERO
            || rates.small_ceiling <= rates.small_tier_1_ceiling
        {
            return Err(EngineError::ConfigParseError {
                path: path.display().to_string(),
                message: format!(
                    "small enterprise ceilings must satisfy 0 < {} < {}",
                    rates.small_tier_1_ceiling, rates.small_ceiling
                ),
            });
        }

        Ok(())
    }

    /// Returns the loaded tables.
    pub fn tables(&self) -> &TaxTables {
        &self.tables
    }

    /// Consumes the loader, returning the loaded tables.
    pub fn into_tables(self) -> TaxTables {
        self.tables
    }

    /// Returns the jurisdiction metadata.
    pub fn jurisdiction(&self) -> &Jurisdiction {
        self.tables.jurisdiction()
    }
}

fn check_fraction(path: &Path, name: &str, rate: Decimal) -> EngineResult<()> {
    if rate < Decimal::ZERO || rate >= Decimal::ONE {
        return Err(EngineError::ConfigParseError {
            path: path.display().to_string(),
            message: format!("rate '{}' must lie in [0, 1), found {}", name, rate),
        });
    }
    Ok(())
}
