//! Root finding for a residual in a single unknown.
//!
//! Closed form when the residual is linear or quadratic in the unknown;
//! otherwise a sign-change scan over a logarithmic grid inside the
//! variable's domain bracket, refined by bisection. The scan returns every
//! root it finds so the caller can apply branch selection.

use pf_core::Tolerances;
use pf_core::VarId;
use pf_expr::{classify_polynomial, Expr, Polynomial};
use pf_system::Domain;

/// Numeric scan configuration.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Grid density for the logarithmic sweep.
    pub points_per_decade: usize,
    /// Smallest nonzero magnitude sampled.
    pub min_magnitude: f64,
    /// Largest magnitude sampled; also clamps unbounded domain brackets.
    pub max_magnitude: f64,
    /// Bisection refinement budget per bracket.
    pub bisection_iters: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            points_per_decade: 20,
            min_magnitude: 1e-9,
            max_magnitude: 1e12,
            bisection_iters: 200,
        }
    }
}

/// How a single-unknown equation resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarOutcome {
    /// Domain-valid roots, ascending and deduplicated.
    Roots(Vec<f64>),
    /// The residual is zero for every value; the equation carries no
    /// information about the unknown.
    Identity,
    /// No domain-valid root exists (or none was found in the scan range).
    NoRoot { reason: String },
}

/// Solve `residual = 0` for `var` within `domain`.
///
/// Every other variable in `residual` must already be folded to a
/// constant.
pub fn solve_scalar(
    residual: &Expr,
    var: VarId,
    domain: Domain,
    cfg: &ScanConfig,
    tol: Tolerances,
) -> ScalarOutcome {
    match classify_polynomial(residual, var) {
        Some(Polynomial::Linear { a1, a0 }) => solve_linear(a1, a0, domain, tol),
        Some(Polynomial::Quadratic { a2, a1, a0 }) => {
            if degenerate(a2, a1.abs().max(a0.abs())) {
                solve_linear(a1, a0, domain, tol)
            } else {
                solve_quadratic(a2, a1, a0, domain)
            }
        }
        None => scan(residual, var, domain, cfg, tol),
    }
}

/// A leading coefficient indistinguishable from zero at the residual's
/// scale.
fn degenerate(coeff: f64, scale: f64) -> bool {
    coeff.abs() <= 1e-12 * scale.max(1.0)
}

fn solve_linear(a1: f64, a0: f64, domain: Domain, tol: Tolerances) -> ScalarOutcome {
    if degenerate(a1, a0.abs()) {
        return if a0.abs() <= tol.abs {
            ScalarOutcome::Identity
        } else {
            ScalarOutcome::NoRoot {
                reason: format!("constant residual {a0:.6e} cannot reach zero"),
            }
        };
    }
    admit(vec![-a0 / a1], domain)
}

fn solve_quadratic(a2: f64, a1: f64, a0: f64, domain: Domain) -> ScalarOutcome {
    let disc = a1 * a1 - 4.0 * a2 * a0;
    if disc < 0.0 {
        return ScalarOutcome::NoRoot {
            reason: format!("negative discriminant {disc:.6e}, no real root"),
        };
    }
    // Citardauq form for the far root avoids cancellation
    let s = if a1 >= 0.0 { 1.0 } else { -1.0 };
    let q = -0.5 * (a1 + s * disc.sqrt());
    let mut roots = vec![q / a2];
    roots.push(if q != 0.0 { a0 / q } else { -a1 / a2 - roots[0] });
    roots.sort_by(|a, b| a.total_cmp(b));
    roots.dedup_by(|a, b| (*a - *b).abs() <= 1e-9 * a.abs().max(1.0));
    admit(roots, domain)
}

/// Filter roots through the domain predicate.
fn admit(roots: Vec<f64>, domain: Domain) -> ScalarOutcome {
    let kept: Vec<f64> = roots.iter().copied().filter(|&r| domain.admits(r)).collect();
    if kept.is_empty() {
        ScalarOutcome::NoRoot {
            reason: format!(
                "root(s) {roots:?} violate the variable's domain {domain:?}"
            ),
        }
    } else {
        ScalarOutcome::Roots(kept)
    }
}

/// Logarithmic grid over `[lo, hi]`, both positive.
fn log_grid(lo: f64, hi: f64, cfg: &ScanConfig, out: &mut Vec<f64>) {
    if hi <= lo {
        return;
    }
    let start = lo.log10();
    let stop = hi.log10();
    let steps = ((stop - start) * cfg.points_per_decade as f64).ceil() as usize;
    out.push(lo);
    for k in 1..steps {
        out.push(10f64.powf(start + (stop - start) * k as f64 / steps as f64));
    }
    out.push(hi);
}

/// Sample points covering the domain bracket, magnitude-logarithmic on
/// each side of zero.
fn sample_points(domain: Domain, cfg: &ScanConfig) -> Vec<f64> {
    let (lo, hi) = domain.bracket();
    let lo = lo.max(-cfg.max_magnitude);
    let hi = hi.min(cfg.max_magnitude);
    let mut points = Vec::new();

    if lo < 0.0 {
        let mut neg = Vec::new();
        log_grid(cfg.min_magnitude.min(-lo), -lo, cfg, &mut neg);
        points.extend(neg.into_iter().rev().map(|v| -v));
    }
    if lo <= 0.0 && hi >= 0.0 {
        points.push(0.0);
    }
    if hi > 0.0 {
        log_grid(cfg.min_magnitude.min(hi), hi, cfg, &mut points);
    }

    points.retain(|&v| domain.admits(v) || v == 0.0 && matches!(domain, Domain::Positive));
    points
}

/// Bisection on a sign-changing bracket. Returns `None` if the residual
/// stops being evaluable inside the bracket.
fn bisect(
    residual: &Expr,
    var: VarId,
    mut lo: f64,
    mut r_lo: f64,
    mut hi: f64,
    cfg: &ScanConfig,
    tol: Tolerances,
) -> Option<f64> {
    for _ in 0..cfg.bisection_iters {
        let mid = 0.5 * (lo + hi);
        if (hi - lo).abs() <= tol.abs.max(tol.rel * mid.abs()) {
            return Some(mid);
        }
        let r_mid = residual.eval(&|id| (id == var).then_some(mid)).ok()?;
        if r_mid == 0.0 {
            return Some(mid);
        }
        if (r_lo < 0.0) == (r_mid < 0.0) {
            lo = mid;
            r_lo = r_mid;
        } else {
            hi = mid;
        }
    }
    Some(0.5 * (lo + hi))
}

/// Sign-change scan over the domain bracket.
fn scan(
    residual: &Expr,
    var: VarId,
    domain: Domain,
    cfg: &ScanConfig,
    tol: Tolerances,
) -> ScalarOutcome {
    let points = sample_points(domain, cfg);
    let mut roots: Vec<f64> = Vec::new();
    let mut prev: Option<(f64, f64)> = None;

    for &v in &points {
        let r = match residual.eval(&|id| (id == var).then_some(v)) {
            Ok(r) => r,
            Err(_) => {
                prev = None;
                continue;
            }
        };
        if r == 0.0 {
            roots.push(v);
            prev = Some((v, r));
            continue;
        }
        if let Some((pv, pr)) = prev {
            if (pr < 0.0) != (r < 0.0) {
                if let Some(root) = bisect(residual, var, pv, pr, v, cfg, tol) {
                    roots.push(root);
                }
            }
        }
        prev = Some((v, r));
    }

    roots.sort_by(|a, b| a.total_cmp(b));
    roots.dedup_by(|a, b| (*a - *b).abs() <= 1e-6 * a.abs().max(1e-12));

    if roots.is_empty() {
        let (lo, hi) = domain.bracket();
        ScalarOutcome::NoRoot {
            reason: format!(
                "no sign change found scanning [{:.3e}, {:.3e}]",
                lo.max(-cfg.max_magnitude),
                hi.min(cfg.max_magnitude)
            ),
        }
    } else {
        admit(roots, domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pf_core::Id;

    fn x() -> Expr {
        Expr::var(Id::from_index(0))
    }

    fn xid() -> VarId {
        Id::from_index(0)
    }

    fn run(residual: Expr, domain: Domain) -> ScalarOutcome {
        solve_scalar(
            &residual,
            xid(),
            domain,
            &ScanConfig::default(),
            Tolerances::default(),
        )
    }

    #[test]
    fn linear_closed_form() {
        match run(3.0 * x() - 12.0, Domain::Free) {
            ScalarOutcome::Roots(r) => assert_eq!(r, vec![4.0]),
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn quadratic_both_roots_kept_in_free_domain() {
        // (x - 1)(x - 3) = x^2 - 4x + 3
        let e = x().pow(2.0) - 4.0 * x() + 3.0;
        match run(e, Domain::Free) {
            ScalarOutcome::Roots(r) => {
                assert_eq!(r.len(), 2);
                assert!((r[0] - 1.0).abs() < 1e-9);
                assert!((r[1] - 3.0).abs() < 1e-9);
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn quadratic_domain_filters_negative_root() {
        // x^2 = 4 has roots +-2; Positive keeps one
        let e = x().pow(2.0) - 4.0;
        match run(e, Domain::Positive) {
            ScalarOutcome::Roots(r) => assert_eq!(r, vec![2.0]),
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn quadratic_no_real_root() {
        let e = x().pow(2.0) + 1.0;
        assert!(matches!(run(e, Domain::Free), ScalarOutcome::NoRoot { .. }));
    }

    #[test]
    fn constant_zero_residual_is_identity() {
        assert_eq!(run(Expr::lit(0.0) * x(), Domain::Free), ScalarOutcome::Identity);
    }

    #[test]
    fn constant_nonzero_residual_has_no_root() {
        let e = Expr::lit(0.0) * x() + 2.5;
        assert!(matches!(run(e, Domain::Free), ScalarOutcome::NoRoot { .. }));
    }

    #[test]
    fn scan_finds_transcendental_root() {
        // exp(x) = 2 at x = ln 2
        let e = x().exp() - 2.0;
        match run(e, Domain::Positive) {
            ScalarOutcome::Roots(r) => {
                assert_eq!(r.len(), 1);
                assert!((r[0] - 2f64.ln()).abs() < 1e-6);
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn scan_finds_both_area_ratio_roots() {
        // The nozzle area-ratio residual in the pressure ratio r = pe/pc:
        //   1/eps - C * r^(1/g) * sqrt(K * (1 - r^((g-1)/g)))
        // has a supersonic (small r) and a subsonic (large r) solution.
        let g: f64 = 1.2;
        let eps = 25.0;
        let c = ((g + 1.0) / 2.0).powf(1.0 / (g - 1.0));
        let k = (g + 1.0) / (g - 1.0);
        let r = x(); // pressure ratio
        let e = Expr::lit(1.0 / eps)
            - c * r.clone().pow(1.0 / g) * (k * (1.0 - r.pow((g - 1.0) / g))).sqrt();
        match run(e, Domain::Range { lo: 1e-9, hi: 1.0 }) {
            ScalarOutcome::Roots(roots) => {
                assert_eq!(roots.len(), 2, "expected supersonic and subsonic roots");
                // Supersonic branch near 0.0038, subsonic near 0.999
                assert!((roots[0] - 0.0038).abs() < 5e-4, "got {roots:?}");
                assert!(roots[1] > 0.9, "got {roots:?}");
            }
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn scan_reports_no_root_when_residual_never_crosses() {
        let e = x().exp() + 1.0;
        assert!(matches!(
            run(e, Domain::Positive),
            ScalarOutcome::NoRoot { .. }
        ));
    }
}
