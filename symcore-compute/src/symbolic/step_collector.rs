/// A type that collects the steps taken by an algorithm as it runs.
///
/// Both the simplifier and the differentiation engine report their work through this trait. The
/// unit type `()` implements it by discarding every step, which lets the engines skip the cost
/// of formatting steps when the caller does not want them; `Vec<S>` collects them in order.
pub trait StepCollector<S> {
    /// Adds a step to the collector.
    fn push(&mut self, step: S);
}

impl<S> StepCollector<S> for () {
    #[inline]
    fn push(&mut self, _: S) {}
}

impl<S> StepCollector<S> for Vec<S> {
    #[inline]
    fn push(&mut self, step: S) {
        self.push(step);
    }
}
