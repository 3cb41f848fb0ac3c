//! Prefix trie over [`Input`](crate::input::Input) sequences, generic over
//! the context a handler is invoked with and the result it produces. Used
//! both by [`crate::state::base::BaseState`] (returning
//! [`crate::state::HandleResult`]) and, potentially, by any other layered
//! state that wants its own chord bindings with a different result shape.

use crate::input::Input;
use std::collections::HashMap;
use std::rc::Rc;

/// `Rc` rather than `Box`: callers that store the handler's owning `Ctx`
/// alongside the map itself (as `BaseState` does) need to clone the handler
/// out before invoking it with `&mut Ctx` — the alternative, calling through
/// a borrow of `self.input_map` while also holding `&mut self`, does not
/// borrow-check.
type Handler<Ctx, Res> = Rc<dyn Fn(&mut Ctx) -> Res>;

/// One node of the trie: children keyed by the next `Input`, plus an
/// optional handler if a sequence terminates here.
///
/// Children are `Rc`-owned rather than stored inline. A caller holding the
/// trie's current position as a cursor (see `BaseState::curr_input_map`)
/// needs that cursor to outlive the borrow it took the step under — the
/// cursor is read again on the *next* input, by which time the handler
/// invoked this tick may have mutated the very struct that owns the trie.
/// `Rc` makes the cursor an independent, cheaply-cloned handle instead of a
/// borrow, sidestepping that self-reference.
pub struct InputMapNode<Ctx, Res> {
    children: HashMap<Input, Rc<InputMapNode<Ctx, Res>>>,
    handler: Option<Handler<Ctx, Res>>,
}

impl<Ctx, Res> Default for InputMapNode<Ctx, Res> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            handler: None,
        }
    }
}

impl<Ctx, Res> InputMapNode<Ctx, Res> {
    pub fn get(&self, input: &Input) -> Option<Rc<InputMapNode<Ctx, Res>>> {
        self.children.get(input).cloned()
    }

    pub fn handler(&self) -> Option<&Handler<Ctx, Res>> {
        self.handler.as_ref()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// The trie itself. Owns the root node; callers walk it one `Input` at a
/// time via [`InputMapNode::get`], resetting to [`InputMap::root`] on a
/// miss or after invoking a handler.
pub struct InputMap<Ctx, Res> {
    root: Rc<InputMapNode<Ctx, Res>>,
}

impl<Ctx, Res> Default for InputMap<Ctx, Res> {
    fn default() -> Self {
        Self {
            root: Rc::new(InputMapNode::default()),
        }
    }
}

impl<Ctx, Res> InputMap<Ctx, Res> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Rc<InputMapNode<Ctx, Res>> {
        self.root.clone()
    }

    /// Walks/creates nodes for `sequence`, overwriting any existing handler
    /// on the terminal node. Only valid while the map is still exclusively
    /// owned (i.e. during setup, before any cursor clone of a node exists).
    pub fn add(&mut self, sequence: &[Input], handler: Handler<Ctx, Res>) {
        let mut node = Rc::get_mut(&mut self.root)
            .expect("InputMap::add called after a cursor was taken");
        for input in sequence {
            let entry = node
                .children
                .entry(*input)
                .or_insert_with(|| Rc::new(InputMapNode::default()));
            node = Rc::get_mut(entry).expect("InputMap::add called after a cursor was taken");
        }
        node.handler = Some(handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn single_key_sequence_is_reachable_from_root() {
        let mut map: InputMap<(), &'static str> = InputMap::new();
        map.add(&[Input::plain(Key::Char('s'))], Rc::new(|_| "stage"));

        let node = map.root().get(&Input::plain(Key::Char('s'))).unwrap();
        assert_eq!((node.handler().unwrap())(&mut ()), "stage");
    }

    #[test]
    fn chord_requires_full_sequence() {
        let mut map: InputMap<(), &'static str> = InputMap::new();
        let seq = [Input::plain(Key::Char('c')), Input::plain(Key::Char('c'))];
        map.add(&seq, Rc::new(|_| "commit"));

        let after_first = map.root().get(&seq[0]).unwrap();
        assert!(after_first.handler().is_none());

        let after_second = after_first.get(&seq[1]).unwrap();
        assert_eq!((after_second.handler().unwrap())(&mut ()), "commit");
    }

    #[test]
    fn readding_a_sequence_overwrites_handler() {
        let mut map: InputMap<(), i32> = InputMap::new();
        let seq = [Input::plain(Key::Char('x'))];
        map.add(&seq, Rc::new(|_| 1));
        map.add(&seq, Rc::new(|_| 2));

        let node = map.root().get(&seq[0]).unwrap();
        assert_eq!((node.handler().unwrap())(&mut ()), 2);
    }

    #[test]
    fn handler_runs_exactly_once_per_invocation() {
        let calls = Rc::new(Cell::new(0));
        let calls2 = calls.clone();
        let mut map: InputMap<(), ()> = InputMap::new();
        map.add(
            &[Input::plain(Key::Char('z'))],
            Rc::new(move |_| {
                calls2.set(calls2.get() + 1);
            }),
        );

        let node = map.root().get(&Input::plain(Key::Char('z'))).unwrap();
        (node.handler().unwrap())(&mut ());
        assert_eq!(calls.get(), 1);
    }
}
