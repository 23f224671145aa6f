//! Integration tests running the calculators against the bundled reference data.

use dk_tax_core::calculations::{
    EmployeeTaxCalculator, EmployeeTaxInput, ProgressiveBrackets, StudentIncomeCalculator,
    StudentIncomeInput,
};
use dk_tax_core::{ReferenceError, ReferenceRepository};
use dk_tax_data::BundledReference;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn reference() -> BundledReference {
    BundledReference::load().expect("bundled reference data must load")
}

#[test]
fn test_bundled_table_has_all_98_municipalities() {
    let reference = reference();

    let municipalities = reference.municipalities(2026).expect("2026 must exist");

    assert_eq!(municipalities.len(), 98);
    assert!(
        municipalities.windows(2).all(|w| w[0].name < w[1].name),
        "municipalities must be sorted by name"
    );
}

#[test]
fn test_copenhagen_rates() {
    let reference = reference();

    let copenhagen = reference.municipality(2026, "København").unwrap();

    assert_eq!(copenhagen.municipal_tax_pct, dec!(23.39));
    assert_eq!(copenhagen.church_tax_pct, dec!(0.80));
    assert_eq!(copenhagen.tax_year, 2026);
}

#[test]
fn test_unknown_municipality() {
    let reference = reference();

    let result = reference.municipality(2026, "Atlantis");

    assert_eq!(
        result,
        Err(ReferenceError::UnknownMunicipality("Atlantis".to_string()))
    );
}

#[test]
fn test_bundled_constants_match_published_2026_values() {
    let constants = reference().constants(2026).unwrap();

    assert_eq!(constants.personal_allowance, dec!(54100));
    assert_eq!(constants.mid_bracket_threshold, dec!(641200));
    assert_eq!(constants.top_bracket_threshold, dec!(777900));
    assert_eq!(constants.ultra_top_bracket_threshold, dec!(2592700));
    assert_eq!(constants.default_annual_earnings_limit(), dec!(248988));
}

#[test]
fn test_employee_scenario_end_to_end() {
    let reference = reference();
    let constants = reference.constants(2026).unwrap();
    let copenhagen = reference.municipality(2026, "København").unwrap();
    let input = EmployeeTaxInput {
        employee_pension_rate: dec!(0.04),
        employer_pension_rate: dec!(0.08),
        church_member: true,
        ..EmployeeTaxInput::new(dec!(480000), copenhagen.rates())
    };

    let result = EmployeeTaxCalculator::new(&constants)
        .calculate(&input)
        .unwrap();

    assert_eq!(result.labour_market_contribution, dec!(37248));
    assert_eq!(result.income_after_contribution, dec!(428352));
    assert_eq!(result.net_annual, dec!(306372.286432));
    assert_eq!(result.net_holiday_pay, dec!(2949.103056));
}

#[test]
fn test_student_over_limit_end_to_end() {
    let reference = reference();
    let constants = reference.constants(2026).unwrap();
    let copenhagen = reference.municipality(2026, "København").unwrap();
    let input = StudentIncomeInput {
        church_member: true,
        ..StudentIncomeInput::new(
            constants.student_grant.away_from_home_monthly,
            dec!(30000),
            copenhagen.rates(),
        )
    };

    let result = StudentIncomeCalculator::new(&constants)
        .calculate(&input)
        .unwrap();

    assert!(result.over_earnings_limit);
    assert_eq!(result.grant_repayment, dec!(89112));
    assert_eq!(result.grant_repayment_interest, dec!(8688.42));
    assert_eq!(result.net_annual, dec!(260451.44035));
}

#[test]
fn test_ceiling_holds_in_every_municipality() {
    let reference = reference();
    let constants = reference.constants(2026).unwrap();
    let brackets = ProgressiveBrackets::new(&constants);

    for municipality in reference.municipalities(2026).unwrap() {
        let fraction = municipality.rates().municipal_fraction();
        let rates = brackets.effective_rates(fraction);
        let total = brackets.base_marginal_rate(fraction) + rates.mid + rates.top + rates.ultra_top;

        assert!(
            total <= constants.tax_ceiling,
            "{} exceeds the ceiling: {}",
            municipality.name,
            total
        );
        assert!(rates.mid <= constants.mid_bracket_rate);
    }
}

#[test]
fn test_highest_municipal_rate_throttles_mid_bracket() {
    let reference = reference();
    let constants = reference.constants(2026).unwrap();
    let langeland = reference.municipality(2026, "Langeland").unwrap();

    let rates = ProgressiveBrackets::new(&constants)
        .effective_rates(langeland.rates().municipal_fraction());

    assert_eq!(rates.mid, dec!(0.0626));
    assert_eq!(rates.top, dec!(0));
}

#[test]
fn test_net_income_is_monotonic_everywhere() {
    let reference = reference();
    let constants = reference.constants(2026).unwrap();
    let calculator = EmployeeTaxCalculator::new(&constants);

    for municipality in reference.municipalities(2026).unwrap() {
        let mut previous = None;
        for step in 0..=30 {
            let input = EmployeeTaxInput {
                church_member: true,
                ..EmployeeTaxInput::new(
                    dec!(100000) * Decimal::from(step),
                    municipality.rates(),
                )
            };
            let net = calculator.calculate(&input).unwrap().net_annual;

            if let Some(previous) = previous {
                assert!(net >= previous, "{} at step {}", municipality.name, step);
            }
            previous = Some(net);
        }
    }
}
