/// A blocking supply of loop ticks, standing in for display-refresh
/// scheduling.
///
/// `wait` blocks until the next tick and returns `false` once the source is
/// exhausted or closed, which ends the loop as cleanly as an explicit stop.
/// Tests drive cycles by handing the loop a manually fed source.
pub trait TickSource: Send {
    fn wait(&mut self) -> bool;
}
