//! The seven-parameter tuple encoded in sweep data filenames.

use std::cmp::Ordering;

/// Parameters of one sweep point, in filename order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SweepParams {
    pub phi: f64,
    pub rc: f64,
    pub n: u32,
    pub alpha: f64,
    pub sigma: f64,
    pub beta: f64,
    pub lambda: f64,
}

fn is_plain_number(field: &str) -> bool {
    !field.is_empty() && field.chars().all(|c| c.is_ascii_digit() || c == '.')
}

/// Split `rest` at the literal `sep`, requiring a digits-and-dots field
/// before it.
fn split_field<'a>(rest: &'a str, sep: &str) -> Option<(&'a str, &'a str)> {
    let (field, tail) = rest.split_once(sep)?;
    if !is_plain_number(field) {
        return None;
    }
    Some((field, tail))
}

impl SweepParams {
    /// Parse `data_phi<F>_rc<F>_N<I>_alpha<F>_sigma<F>_beta<F>_lambda<F>.dat`.
    /// Anything short of a full seven-field match is `None`; fields accept
    /// digits and dots only (`N`: digits only).
    pub fn from_file_name(name: &str) -> Option<SweepParams> {
        let rest = name.strip_prefix("data_phi")?;
        let (phi, rest) = split_field(rest, "_rc")?;
        let (rc, rest) = split_field(rest, "_N")?;
        let (n, rest) = split_field(rest, "_alpha")?;
        let (alpha, rest) = split_field(rest, "_sigma")?;
        let (sigma, rest) = split_field(rest, "_beta")?;
        let (beta, rest) = split_field(rest, "_lambda")?;
        let lambda = rest.strip_suffix(".dat")?;
        if !is_plain_number(lambda) || !n.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Some(SweepParams {
            phi: phi.parse().ok()?,
            rc: rc.parse().ok()?,
            n: n.parse().ok()?,
            alpha: alpha.parse().ok()?,
            sigma: sigma.parse().ok()?,
            beta: beta.parse().ok()?,
            lambda: lambda.parse().ok()?,
        })
    }

    /// Render the tuple back into the naming convention, fixed point.
    pub fn file_name(&self) -> String {
        format!(
            "data_phi{:.6}_rc{:.6}_N{}_alpha{:.6}_sigma{:.6}_beta{:.6}_lambda{:.6}.dat",
            self.phi, self.rc, self.n, self.alpha, self.sigma, self.beta, self.lambda
        )
    }

    /// Lexicographic order over the full tuple, field order as named.
    pub fn cmp(&self, other: &SweepParams) -> Ordering {
        self.phi
            .total_cmp(&other.phi)
            .then_with(|| self.rc.total_cmp(&other.rc))
            .then_with(|| self.n.cmp(&other.n))
            .then_with(|| self.alpha.total_cmp(&other.alpha))
            .then_with(|| self.sigma.total_cmp(&other.sigma))
            .then_with(|| self.beta.total_cmp(&other.beta))
            .then_with(|| self.lambda.total_cmp(&other.lambda))
    }
}
