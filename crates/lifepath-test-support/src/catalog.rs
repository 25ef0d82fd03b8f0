//! A small but complete scenario catalog fixture.

use lifepath_catalog::ScenarioCatalog;

/// YAML source of the fixture catalog.
///
/// Every life stage has at least one scenario; a full run resolves seven
/// decisions and finishes around age 30. The `events` pool exercises the
/// legacy prerequisite gates.
const SAMPLE_CATALOG_YAML: &str = r"
stages:
  teenager:
    - id: part-time-job
      title: A weekend job at the grocery store
      category: career
      options:
        - id: take-job
          text: Take the job and bank the pay
          impact: { savings: 2000, income: 5000 }
          outcome_text: Early paychecks, early savings.
          educational_note: Income started early compounds the longest.
        - id: spend-it
          text: Take the job and spend every paycheck
          impact: { savings: -3000, income: 5000 }
          outcome_text: Fun weekends, empty account.
    - id: first-budget
      title: Your first monthly budget
      category: lifestyle
      options:
        - id: strict
          text: Track every dollar
          impact: { savings: 1000 }
          outcome_text: The habit sticks.
        - id: loose
          text: Wing it
          impact: { savings: -1000 }
          outcome_text: Money leaks away.
  young-adult:
    - id: college
      title: Enroll in college?
      category: education
      options:
        - id: enroll
          text: Enroll with a student loan
          impact: { debt: 30000, income: 20000 }
          age_impact: 4
          outcome_text: Four years of study, a degree, a loan.
          educational_note: Student debt trades present cost for future income.
        - id: straight-to-work
          text: Go straight to work
          impact: { income: 25000, savings: -2000 }
          outcome_text: A head start on earnings.
  adult:
    - id: buy-home
      title: Buy a home or keep renting?
      category: housing
      options:
        - id: buy
          text: Buy with a 10% down payment
          impact: { savings: -40000, debt: 200000, expenses: 12000 }
          outcome_text: Keys in hand, mortgage on the books.
        - id: rent
          text: Keep renting
          impact: { expenses: 18000, savings: -6000 }
          outcome_text: Flexible, but nothing builds equity.
  middle-age:
    - id: pay-down-debt
      title: Attack the mortgage early?
      category: debt
      options:
        - id: aggressive
          text: Throw savings at the principal
          impact: { savings: -50000, debt: -80000 }
          outcome_text: The balance collapses.
        - id: coast
          text: Pay the minimum and invest the rest
          impact: { savings: 5000 }
          outcome_text: Slow and steady.
  senior:
    - id: retirement-call
      title: Retire now or keep working?
      category: retirement
      options:
        - id: retire-early
          text: Retire early
          impact: { income: -20000, expenses: -5000 }
          age_impact: 5
          outcome_text: Free time, fixed income.
        - id: keep-working
          text: Work five more years
          impact: { savings: 30000, income: 5000 }
          age_impact: 5
          outcome_text: The nest egg grows.
  elderly:
    - id: estate-plan
      title: Settle the estate plan
      category: lifestyle
      options:
        - id: write-will
          text: Write the will with a lawyer
          impact: { savings: -2000 }
          outcome_text: Everything is in order.
        - id: procrastinate
          text: Put it off
          impact: { savings: -8000 }
          outcome_text: Probate costs pile up later.
events:
  - id: market-dip
    title: The market drops 20%
    category: lifestyle
    age_range: { min: 25, max: 70 }
    prerequisite: { min_savings: 10000 }
    options:
      - id: hold
        text: Hold your positions
        impact: { savings: -5000 }
        outcome_text: Paper losses only.
  - id: job-loss
    title: Your employer downsizes
    category: career
    prerequisite: { has_income: true }
    options:
      - id: job-hunt
        text: Start the job hunt immediately
        impact: { income: -10000 }
        outcome_text: A gap, then a new desk.
";

/// Builds the validated fixture catalog.
///
/// # Panics
///
/// Panics if the embedded fixture fails validation — a test-support bug.
#[must_use]
pub fn sample_catalog() -> ScenarioCatalog {
    ScenarioCatalog::from_yaml_str(SAMPLE_CATALOG_YAML)
        .expect("fixture catalog must parse and validate")
}
