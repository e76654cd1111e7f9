//! Integration tests for hierarchy ownership, cascades and traversal.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use trellis::{
        Anchor, Core, Flag, FocusManager, NodeId, Panel, Scaling,
        error::{Error, Result},
    };

    /// Build a tree from a parent table: `parents[i]` indexes an earlier node.
    fn build(core: &mut Core, parents: &[usize], containers: &[bool]) -> Result<Vec<NodeId>> {
        let root = core.create_root(Panel).node();
        let mut ids = vec![root];
        for (i, parent) in parents.iter().enumerate() {
            let parent = ids[parent % (i + 1)];
            ids.push(core.create(parent, Panel)?.node());
        }
        for (id, container) in ids.iter().zip(containers) {
            core.set_container(*id, *container)?;
        }
        Ok(ids)
    }

    #[test]
    fn destroy_three_level_subtree() -> Result<()> {
        let mut core = Core::new();
        let grandparent = core.create_root(Panel).node();
        let child = core.create(grandparent, Panel)?.node();
        let grandchild = core.create(child, Panel)?.node();
        let leaf = core.create(grandchild, Panel)?.node();

        core.destroy_recursive(child)?;
        for id in [child, grandchild, leaf] {
            assert!(!core.contains(id));
            assert_eq!(core.parent(id), Err(Error::NodeNotFound(id)));
        }
        assert!(!core.children(grandparent)?.contains(&child));
        assert_eq!(core.len(), 1);
        Ok(())
    }

    #[test]
    fn destroying_a_root_removes_it_from_roots() -> Result<()> {
        let mut core = Core::new();
        let a = core.create_root(Panel).node();
        let b = core.create_root(Panel).node();
        core.destroy_recursive(a)?;
        assert_eq!(core.roots(), &[b]);
        Ok(())
    }

    #[test]
    fn reparent_moves_exactly_once() -> Result<()> {
        let mut core = Core::new();
        let root = core.create_root(Panel).node();
        let p = core.create(root, Panel)?.node();
        let q = core.create(root, Panel)?.node();
        let child = core.create(p, Panel)?.node();
        core.create(p, Panel)?;

        core.set_parent(child, q)?;
        assert_eq!(core.children(p)?.len(), 1);
        assert!(!core.children(p)?.contains(&child));
        assert_eq!(core.children(q)?, &[child]);
        assert_eq!(core.parent(child)?, Some(q));
        Ok(())
    }

    #[test]
    fn reparent_copies_parent_flags_over_subtree() -> Result<()> {
        let mut core = Core::new();
        let root = core.create_root(Panel).node();
        let hidden = core.create(root, Panel)?.node();
        let moved = core.create(root, Panel)?.node();
        let below = core.create(moved, Panel)?.node();
        core.set_hidden(hidden, true)?;
        core.set_active(below, false)?;

        core.set_parent(moved, hidden)?;
        for id in [moved, below] {
            let node = core.node(id).ok_or(Error::NodeNotFound(id))?;
            assert!(node.is_hidden());
            assert!(node.flags().active);
            assert!(!node.is_visible());
            assert!(!node.is_active());
        }
        Ok(())
    }

    #[test]
    fn recursive_flags_overwrite() -> Result<()> {
        let mut core = Core::new();
        let root = core.create_root(Panel).node();
        let a = core.create(root, Panel)?.node();
        let b = core.create(a, Panel)?.node();

        core.set_excluded(b, true)?;
        core.set_excluded_recursive(root, false)?;
        assert!(!core.flags(b)?.excluded);

        core.set_excluded_recursive(root, true)?;
        core.set_excluded_recursive(a, false)?;
        assert!(core.flags(root)?.excluded);
        assert!(!core.flags(a)?.excluded);
        assert!(!core.flags(b)?.excluded);

        core.hide(root)?;
        assert!(core.node(b).is_some_and(|n| n.is_hidden()));
        core.show(a)?;
        assert!(core.node(root).is_some_and(|n| n.is_hidden()));
        assert!(!core.node(b).is_some_and(|n| n.is_hidden()));
        Ok(())
    }

    /// `(is_visible, is_active)` of a widget.
    fn derived(core: &Core, id: NodeId) -> (bool, bool) {
        core.node(id)
            .map_or((false, false), |n| (n.is_visible(), n.is_active()))
    }

    #[test]
    fn derived_state_formulas() -> Result<()> {
        let mut core = Core::new();
        let w = core.create_root(Panel).node();
        assert_eq!(derived(&core, w), (true, true));

        core.set_visible(w, false)?;
        assert_eq!(derived(&core, w), (false, true));
        core.set_visible(w, true)?;
        core.set_active(w, false)?;
        assert_eq!(derived(&core, w), (true, false));
        core.set_active(w, true)?;

        for flag in [Flag::Hidden, Flag::Excluded, Flag::Collapsed] {
            core.set_flag(w, flag, true)?;
            assert_eq!(derived(&core, w), (false, false), "{flag:?}");
            core.set_flag(w, flag, false)?;
        }
        assert_eq!(derived(&core, w), (true, true));
        Ok(())
    }

    #[test]
    fn excluded_same_depth_skips_nested_containers() -> Result<()> {
        let mut core = Core::new();
        let root = core.create_root(Panel).node();
        let row = core.create(root, Panel)?.node();
        let sibling = core.create(root, Panel)?.node();
        let window = core.create(row, Panel)?.node();
        core.set_container(window, true)?;
        let inner = core.create(window, Panel)?.node();

        core.set_excluded_same_depth(root, true)?;
        for id in [root, row, sibling, window] {
            assert!(core.flags(id)?.excluded, "{id:?} should be excluded");
        }
        assert!(!core.flags(inner)?.excluded);
        Ok(())
    }

    #[test]
    fn recurse_children_is_pre_order() -> Result<()> {
        let mut core = Core::new();
        let root = core.create_root(Panel).node();
        let a = core.create(root, Panel)?.node();
        let a1 = core.create(a, Panel)?.node();
        let b = core.create(root, Panel)?.node();

        let mut seen = Vec::new();
        core.recurse_children(root, true, |_, id| {
            seen.push(id);
            Ok(())
        })?;
        assert_eq!(seen, vec![root, a, a1, b]);

        seen.clear();
        core.recurse_children(root, false, |_, id| {
            seen.push(id);
            Ok(())
        })?;
        assert_eq!(seen, vec![a, a1, b]);
        Ok(())
    }

    #[test]
    fn bf_visits_containers_before_contents() -> Result<()> {
        let mut core = Core::new();
        let root = core.create_root(Panel).node();
        core.set_container(root, true)?;
        let window = core.create(root, Panel)?.node();
        core.set_container(window, true)?;
        let button = core.create(window, Panel)?.node();
        let other = core.create(root, Panel)?.node();

        let mut seen = Vec::new();
        core.recurse_children_bf(root, true, false, |_, id| {
            seen.push(id);
            Ok(())
        })?;
        assert_eq!(seen, vec![root, window, other, button]);

        seen.clear();
        core.recurse_children_bf(root, true, true, |_, id| {
            seen.push(id);
            Ok(())
        })?;
        assert_eq!(seen, vec![button, window, other, root]);
        Ok(())
    }

    #[test]
    fn traversal_errors_propagate() -> Result<()> {
        let mut core = Core::new();
        let root = core.create_root(Panel).node();
        core.create(root, Panel)?;
        let mut visits = 0;
        let result = core.recurse_children(root, true, |_, _| {
            visits += 1;
            Err(Error::InvalidOperation("stop".into()))
        });
        assert!(result.is_err());
        assert_eq!(visits, 1);
        Ok(())
    }

    #[test]
    fn random_tree_no_panics() -> Result<()> {
        let mut core = Core::new();
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut live: Vec<NodeId> = Vec::new();
        for _ in 0..400 {
            match rng.random_range(0..8) {
                0 | 1 if !live.is_empty() => {
                    let parent = live[rng.random_range(0..live.len())];
                    live.push(core.create(parent, Panel)?.node());
                }
                0 | 1 | 2 => live.push(core.create_root(Panel).node()),
                3 if live.len() > 1 => {
                    let child = live[rng.random_range(0..live.len())];
                    let parent = live[rng.random_range(0..live.len())];
                    match core.set_parent(child, parent) {
                        Ok(()) | Err(Error::WouldCreateCycle { .. }) => {}
                        Err(e) => return Err(e),
                    }
                }
                4 if !live.is_empty() => {
                    let id = live[rng.random_range(0..live.len())];
                    core.begin_frame();
                    core.destroy_recursive(id)?;
                    core.end_frame();
                    live.retain(|id| core.contains(*id));
                }
                5 if live.len() > 1 => {
                    let a = live[rng.random_range(0..live.len())];
                    let b = live[rng.random_range(0..live.len())];
                    if a != b {
                        core.attach(a, Anchor::Left, b, Anchor::Right, (1.0, 0.0))?;
                    }
                }
                6 if !live.is_empty() => {
                    let id = live[rng.random_range(0..live.len())];
                    let scaling = match rng.random_range(0..4) {
                        0 => Scaling::Manual,
                        1 => Scaling::FitToChildren,
                        2 => Scaling::FitToNeighbor,
                        _ => Scaling::FitToParent,
                    };
                    core.set_scaling(id, scaling)?;
                    core.set_container(id, rng.random_bool(0.5))?;
                    core.set_size(id, (rng.random_range(0.0..20.0), rng.random_range(0.0..20.0)))?;
                }
                7 if !live.is_empty() => {
                    let id = live[rng.random_range(0..live.len())];
                    core.gain_exclusive_focus(id)?;
                }
                _ => {}
            }

            core.begin_frame();
            for root in core.roots().to_vec() {
                core.recurse_children(root, true, |core, id| core.resolve_both(id))?;
            }
            core.end_frame();
        }

        assert_eq!(core.len(), live.len());
        for id in &live {
            let node = core.node(*id).ok_or(Error::NodeNotFound(*id))?;
            if let Some(parent) = node.parent() {
                let parent_node = core.node(parent).ok_or(Error::NodeNotFound(parent))?;
                let expected = parent_node.depth() + usize::from(parent_node.is_container());
                assert_eq!(node.depth(), expected);
            }
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn bf_order_is_stable_by_depth(
            parents in prop::collection::vec(0usize..64, 0..40),
            containers in prop::collection::vec(any::<bool>(), 41),
            reverse in any::<bool>(),
        ) {
            let mut core = Core::new();
            let ids = build(&mut core, &parents, &containers).unwrap();
            let root = ids[0];
            let pre = core.subtree_pre_order(root);

            let mut seen = Vec::new();
            core.recurse_children_bf(root, true, reverse, |_, id| {
                seen.push(id);
                Ok(())
            }).unwrap();
            prop_assert_eq!(seen.len(), pre.len());

            let depth = |id: NodeId| core.depth(id).unwrap();
            let position = |id: NodeId| pre.iter().position(|p| *p == id).unwrap();
            for pair in seen.windows(2) {
                let (a, b) = (pair[0], pair[1]);
                if reverse {
                    prop_assert!(depth(a) >= depth(b));
                } else {
                    prop_assert!(depth(a) <= depth(b));
                }
                if depth(a) == depth(b) {
                    prop_assert!(position(a) < position(b));
                }
            }
        }

        #[test]
        fn reparent_counts(
            parents in prop::collection::vec(0usize..64, 2..30),
            pick in any::<prop::sample::Index>(),
            target in any::<prop::sample::Index>(),
        ) {
            let mut core = Core::new();
            let ids = build(&mut core, &parents, &[]).unwrap();
            let child = ids[1 + pick.index(ids.len() - 1)];
            let new_parent = ids[target.index(ids.len())];
            let old_parent = core.parent(child).unwrap().unwrap();
            let old_before = core.children(old_parent).unwrap().len();
            let new_before = core.children(new_parent).unwrap().len();

            match core.set_parent(child, new_parent) {
                Err(Error::WouldCreateCycle { .. }) => {
                    prop_assert_eq!(core.children(old_parent).unwrap().len(), old_before);
                }
                Err(e) => return Err(TestCaseError::fail(e.to_string())),
                Ok(()) => {
                    let count = core
                        .children(new_parent)
                        .unwrap()
                        .iter()
                        .filter(|id| **id == child)
                        .count();
                    prop_assert_eq!(count, 1);
                    if old_parent == new_parent {
                        prop_assert_eq!(core.children(new_parent).unwrap().len(), new_before);
                    } else {
                        prop_assert!(!core.children(old_parent).unwrap().contains(&child));
                        prop_assert_eq!(core.children(old_parent).unwrap().len(), old_before - 1);
                        prop_assert_eq!(core.children(new_parent).unwrap().len(), new_before + 1);
                    }
                }
            }
        }
    }
}
