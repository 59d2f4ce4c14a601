//! Configuration types for the tax tables.
//!
//! This module contains the strongly-typed structures deserialized from the
//! YAML table files, and [`TaxTables`], the validated aggregate every
//! calculator reads from.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Bracket, BracketTable, TaxPeriod, VatRate};

/// Metadata about the jurisdiction and policy year the tables describe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jurisdiction {
    /// A short code identifying the table set (e.g., "CN-2024").
    pub code: String,
    /// The human-readable name of the table set.
    pub name: String,
    /// The version of the tables.
    pub version: String,
    /// The date from which these tables apply.
    pub effective_date: NaiveDate,
    /// URL to the official policy documentation.
    pub source_url: String,
}

/// Individual income tax file structure, as read from `individual.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct IndividualTaxConfig {
    /// Basic deduction for annual consolidated income.
    pub annual_basic_deduction: Decimal,
    /// Basic deduction for monthly withholding.
    pub monthly_basic_deduction: Decimal,
    /// Annual progressive brackets, unvalidated.
    pub annual_brackets: Vec<Bracket>,
    /// Monthly progressive brackets, unvalidated.
    pub monthly_brackets: Vec<Bracket>,
}

/// Validated individual income tax tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndividualTaxTables {
    /// Basic deduction for annual consolidated income.
    pub annual_basic_deduction: Decimal,
    /// Basic deduction for monthly withholding.
    pub monthly_basic_deduction: Decimal,
    /// Annual progressive brackets.
    pub annual_brackets: BracketTable,
    /// Monthly progressive brackets.
    pub monthly_brackets: BracketTable,
}

/// VAT rate catalogue from `vat.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VatRates {
    /// General taxpayer standard rate.
    pub standard: Decimal,
    /// Reduced rate.
    pub reduced: Decimal,
    /// Modern services rate.
    pub services: Decimal,
    /// Small-scale taxpayer levy rate.
    pub small_scale: Decimal,
    /// Small-scale taxpayer preferential rate.
    pub small_scale_reduced: Decimal,
}

impl VatRates {
    /// Returns the fraction for a rate category.
    pub fn rate(&self, category: VatRate) -> Decimal {
        match category {
            VatRate::Standard => self.standard,
            VatRate::Reduced => self.reduced,
            VatRate::Services => self.services,
            VatRate::SmallScale => self.small_scale,
            VatRate::SmallScaleReduced => self.small_scale_reduced,
        }
    }

    /// Returns every category with its fraction, highest rate first.
    pub fn all(&self) -> [(VatRate, Decimal); 5] {
        [
            (VatRate::Standard, self.standard),
            (VatRate::Reduced, self.reduced),
            (VatRate::Services, self.services),
            (VatRate::SmallScale, self.small_scale),
            (VatRate::SmallScaleReduced, self.small_scale_reduced),
        ]
    }
}

/// Corporate income tax rates from `corporate.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorporateRates {
    /// Standard rate.
    pub normal: Decimal,
    /// High and new technology enterprise rate.
    pub high_tech: Decimal,
    /// Small enterprise rate on taxable income up to `small_tier_1_ceiling`.
    pub small_tier_1_rate: Decimal,
    /// Small enterprise rate on the portion above `small_tier_1_ceiling`.
    pub small_tier_2_rate: Decimal,
    /// Upper bound of the first small enterprise tier.
    pub small_tier_1_ceiling: Decimal,
    /// Taxable income above which small enterprise relief no longer applies.
    pub small_ceiling: Decimal,
}

/// Default employee social insurance rates from `social_insurance.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialInsuranceDefaults {
    /// Pension insurance rate.
    pub pension: Decimal,
    /// Medical insurance rate.
    pub medical: Decimal,
    /// Unemployment insurance rate.
    pub unemployment: Decimal,
    /// Housing provident fund rate.
    pub housing_fund: Decimal,
}

/// The complete, validated set of tax tables.
///
/// Tables are immutable once built and may be shared freely between threads.
///
/// # Example
///
/// ```
/// use tax_engine::config::TaxTables;
/// use tax_engine::models::TaxPeriod;
/// use rust_decimal_macros::dec;
///
/// let tables = TaxTables::statutory();
/// assert_eq!(tables.basic_deduction(TaxPeriod::Annual), dec!(60000));
/// assert_eq!(tables.brackets(TaxPeriod::Monthly).len(), 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxTables {
    jurisdiction: Jurisdiction,
    individual: IndividualTaxTables,
    vat: VatRates,
    corporate: CorporateRates,
    social_insurance: SocialInsuranceDefaults,
}

impl TaxTables {
    /// Creates a new TaxTables from its component parts.
    pub fn new(
        jurisdiction: Jurisdiction,
        individual: IndividualTaxTables,
        vat: VatRates,
        corporate: CorporateRates,
        social_insurance: SocialInsuranceDefaults,
    ) -> Self {
        Self {
            jurisdiction,
            individual,
            vat,
            corporate,
            social_insurance,
        }
    }

    /// Returns the jurisdiction metadata.
    pub fn jurisdiction(&self) -> &Jurisdiction {
        &self.jurisdiction
    }

    /// Returns the individual income tax tables.
    pub fn individual(&self) -> &IndividualTaxTables {
        &self.individual
    }

    /// Returns the bracket table for a tax period.
    pub fn brackets(&self, period: TaxPeriod) -> &BracketTable {
        match period {
            TaxPeriod::Annual => &self.individual.annual_brackets,
            TaxPeriod::Monthly => &self.individual.monthly_brackets,
        }
    }

    /// Returns the statutory basic deduction for a tax period.
    pub fn basic_deduction(&self, period: TaxPeriod) -> Decimal {
        match period {
            TaxPeriod::Annual => self.individual.annual_basic_deduction,
            TaxPeriod::Monthly => self.individual.monthly_basic_deduction,
        }
    }

    /// Returns the VAT rate catalogue.
    pub fn vat(&self) -> &VatRates {
        &self.vat
    }

    /// Returns the corporate income tax rates.
    pub fn corporate(&self) -> &CorporateRates {
        &self.corporate
    }

    /// Returns the default social insurance rates.
    pub fn social_insurance(&self) -> &SocialInsuranceDefaults {
        &self.social_insurance
    }
}
