//! Declaration tree port.

use dollop_domain::Declaration;

/// What the walk should do with a declaration after visiting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkAction {
    /// Keep the declaration in place.
    Keep,
    /// Remove the declaration from its container.
    Remove,
}

/// An ordered, mutable sequence of declarations belonging to one document.
///
/// The tree owns its nodes; the resolver only rewrites values or asks for a
/// node to be removed.
pub trait DeclarationTree {
    /// Visits every declaration once, in document order, applying the action
    /// returned by `visit`.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error produced by `visit`. Nodes visited
    /// before the error keep their changes.
    fn walk_declarations<E, F>(&mut self, visit: F) -> Result<(), E>
    where
        F: FnMut(&mut Declaration) -> Result<WalkAction, E>;
}

impl DeclarationTree for Vec<Declaration> {
    fn walk_declarations<E, F>(&mut self, mut visit: F) -> Result<(), E>
    where
        F: FnMut(&mut Declaration) -> Result<WalkAction, E>,
    {
        let mut index = 0;
        while index < self.len() {
            match visit(&mut self[index])? {
                WalkAction::Keep => index += 1,
                WalkAction::Remove => {
                    self.remove(index);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_walk_visits_in_order_and_removes() {
        let mut decls = vec![
            Declaration::new("$a", "1"),
            Declaration::new("width", "2"),
            Declaration::new("$b", "3"),
        ];
        let mut seen = Vec::new();

        decls
            .walk_declarations::<(), _>(|decl| {
                seen.push(decl.prop.clone());
                if decl.prop.starts_with('$') {
                    Ok(WalkAction::Remove)
                } else {
                    decl.value.push_str("px");
                    Ok(WalkAction::Keep)
                }
            })
            .expect("walk");

        assert_eq!(seen, vec!["$a", "width", "$b"]);
        assert_eq!(decls, vec![Declaration::new("width", "2px")]);
    }

    #[test]
    fn test_walk_stops_at_first_error() {
        let mut decls = vec![
            Declaration::new("a", "1"),
            Declaration::new("b", "2"),
            Declaration::new("c", "3"),
        ];
        let mut visited = 0;

        let result = decls.walk_declarations(|decl| {
            visited += 1;
            if decl.prop == "b" {
                Err("boom")
            } else {
                Ok(WalkAction::Keep)
            }
        });

        assert_eq!(result, Err("boom"));
        assert_eq!(visited, 2);
    }
}
