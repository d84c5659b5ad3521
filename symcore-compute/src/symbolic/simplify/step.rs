use std::fmt;

/// A simplification rule that fired, reported through
/// [`StepCollector`](crate::symbolic::step_collector::StepCollector).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Constant subexpressions were folded with exact arithmetic.
    FoldConstants,

    /// A literal power identity fired, such as `x^0 = 1` or `x^1 = x`.
    PowerIdentity,

    /// An engine call embedded in the expression was resolved, such as `diff(x^2, x)`.
    ResolveEngineCall,

    /// `0 + a = a`
    AddZero,

    /// Like terms were combined, such as `2x + 3x = 5x`.
    CombineLikeTerms,

    /// `0 * a = 0`
    MultiplyZero,

    /// `1 * a = a`
    MultiplyOne,

    /// Like factors were combined, such as `x^2 * x^3 = x^5`.
    CombineLikeFactors,

    /// `(x^a)^b = x^(a*b)`
    PowerOfPower,

    /// `(a*b)^c = a^c * b^c`
    DistributePower,

    /// A small integer power of a sum was expanded binomially.
    ExpandBinomial,

    /// An additive factor was distributed across a product.
    DistributiveProperty,

    /// A quotient of equal-base powers was collapsed.
    QuotientOfPowers,

    /// A logarithm or exponential identity fired, such as `ln(e^x) = x`.
    LogExpIdentity,

    /// A trigonometric identity fired, such as `sin(u)^2 + cos(u)^2 = 1`.
    TrigIdentity,

    /// A factorial was rewritten through the gamma function, or back.
    FactorialGamma,

    /// Tensor arithmetic was performed elementwise or bilinearly.
    TensorArithmetic,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::FoldConstants => "fold constant arithmetic",
            Self::PowerIdentity => "apply a literal power identity",
            Self::ResolveEngineCall => "resolve an embedded engine call",
            Self::AddZero => "drop zero terms",
            Self::CombineLikeTerms => "combine like terms",
            Self::MultiplyZero => "a zero factor annihilates the product",
            Self::MultiplyOne => "drop factors of one",
            Self::CombineLikeFactors => "combine like factors",
            Self::PowerOfPower => "multiply nested exponents",
            Self::DistributePower => "distribute a power over a product",
            Self::ExpandBinomial => "expand a small binomial power",
            Self::DistributiveProperty => "distribute a factor over a sum",
            Self::QuotientOfPowers => "subtract exponents in a quotient",
            Self::LogExpIdentity => "apply a logarithm/exponential identity",
            Self::TrigIdentity => "apply a trigonometric identity",
            Self::FactorialGamma => "normalize factorial through gamma",
            Self::TensorArithmetic => "perform tensor arithmetic",
        };
        write!(f, "{}", text)
    }
}
