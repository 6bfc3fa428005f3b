use crate::executable::Selection;
use crate::executable::SelectionSet;
use crate::response::GraphQLError;
use crate::response::GraphQLLocation;
use crate::validation::ValidationContext;
use crate::validation::ValidationRule;
use crate::Name;
use indexmap::IndexMap;
use indexmap::IndexSet;

/// Fragment spreads name a fragment defined in the document
///
/// <https://spec.graphql.org/October2021/#sec-Fragment-spread-target-defined>
#[derive(Debug, Clone, Copy)]
pub struct KnownFragmentNames;

/// Fragments do not spread themselves, directly or through other fragments
///
/// <https://spec.graphql.org/October2021/#sec-Fragment-spreads-must-not-form-cycles>
#[derive(Debug, Clone, Copy)]
pub struct NoFragmentCycles;

impl ValidationRule for KnownFragmentNames {
    fn name(&self) -> &'static str {
        "KnownFragmentNames"
    }

    fn check(&self, ctx: &ValidationContext<'_>, errors: &mut Vec<GraphQLError>) {
        let document = ctx.document;
        let selection_sets = document
            .operations()
            .map(|operation| &operation.selection_set)
            .chain(document.fragments.values().map(|fragment| &fragment.selection_set));
        for selection_set in selection_sets {
            for_each_spread(selection_set, &mut |spread_name, location| {
                if !document.fragments.contains_key(spread_name) {
                    errors.push(GraphQLError::new(
                        format!("cannot find fragment `{spread_name}` in this document"),
                        location,
                    ))
                }
            })
        }
    }
}

impl ValidationRule for NoFragmentCycles {
    fn name(&self) -> &'static str {
        "NoFragmentCycles"
    }

    fn check(&self, ctx: &ValidationContext<'_>, errors: &mut Vec<GraphQLError>) {
        let fragments = &ctx.document.fragments;
        // Names of fragments spread anywhere in each fragment, not following spreads
        let spreads: IndexMap<&Name, IndexSet<&Name>> = fragments
            .values()
            .map(|fragment| {
                let mut names = IndexSet::new();
                for_each_spread(&fragment.selection_set, &mut |name, _| {
                    names.insert(name);
                });
                (&fragment.name, names)
            })
            .collect();
        for fragment in fragments.values() {
            if let Some(via) = find_cycle(&spreads, &fragment.name) {
                let message = if via.is_empty() {
                    format!("`{}` fragment cannot reference itself", fragment.name)
                } else {
                    let via = via
                        .iter()
                        .map(|name| format!("`{name}`"))
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!(
                        "`{}` fragment cannot reference itself, it spreads itself via {via}",
                        fragment.name
                    )
                };
                errors.push(GraphQLError::new(message, fragment.location))
            }
        }
    }
}

/// Depth-first search for a path of spreads from `start` back to itself.
/// Returns the fragments in between.
fn find_cycle<'a>(
    spreads: &IndexMap<&'a Name, IndexSet<&'a Name>>,
    start: &'a Name,
) -> Option<Vec<&'a Name>> {
    let mut visited = IndexSet::new();
    let mut stack = vec![(start, 0_usize)];
    while let Some((current, next_index)) = stack.last_mut() {
        let Some(&spread) = spreads.get(*current).and_then(|names| names.get_index(*next_index))
        else {
            stack.pop();
            continue;
        };
        *next_index += 1;
        if spread == start {
            return Some(stack[1..].iter().map(|(name, _)| *name).collect());
        }
        if visited.insert(spread) {
            stack.push((spread, 0))
        }
    }
    None
}

/// Calls `f` with the name and location of every fragment spread in this selection set,
/// including nested ones. Does not follow spreads.
fn for_each_spread<'a>(
    selection_set: &'a SelectionSet,
    f: &mut dyn FnMut(&'a Name, Option<GraphQLLocation>),
) {
    for selection in &selection_set.selections {
        match selection {
            Selection::Field(field) => for_each_spread(&field.selection_set, f),
            Selection::InlineFragment(inline) => for_each_spread(&inline.selection_set, f),
            Selection::FragmentSpread(spread) => f(&spread.fragment_name, spread.location),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_search() {
        let name = |s: &str| Name::new_unchecked(s);
        let (a, b, c, d) = (name("A"), name("B"), name("C"), name("D"));
        let mut spreads = IndexMap::new();
        spreads.insert(&a, [&b, &d].into_iter().collect::<IndexSet<_>>());
        spreads.insert(&b, [&c].into_iter().collect());
        spreads.insert(&c, [&a].into_iter().collect());
        spreads.insert(&d, [&d].into_iter().collect());

        assert_eq!(find_cycle(&spreads, &a), Some(vec![&b, &c]));
        assert_eq!(find_cycle(&spreads, &d), Some(vec![]));
        // D is a cycle reachable from A, but not one through A
        spreads.get_mut(&c).unwrap().clear();
        assert_eq!(find_cycle(&spreads, &a), None);
    }
}
