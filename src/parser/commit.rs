// One boolean per active backtrackable combinator invocation (`maybe`,
// `any_of`, `list_of`). `commit()` sets the innermost frame's flag, which
// turns any subsequent recoverable failure within that frame into a
// propagating one instead of a backtrack.

#[derive(Default)]
pub struct CommitStack {
    frames: Vec<bool>,
}

impl CommitStack {
    pub fn push_frame(&mut self) {
        self.frames.push(false);
    }

    /// Pops the innermost frame and reports whether it was committed.
    pub fn pop_frame(&mut self) -> bool {
        self.frames.pop().expect("commit frame popped without a matching push")
    }

    /// Sets the innermost frame's commit flag. `None` if there is no active
    /// frame — the caller turns that into a fatal error, since committing
    /// outside a backtrack frame is a grammar bug, not a parse failure.
    pub fn commit_innermost(&mut self) -> Option<()> {
        let flag = self.frames.last_mut()?;
        *flag = true;
        Some(())
    }
}
