use proptest::prelude::*;
use scanlink::codec::{decode, encode, DependencyNode};
use scanlink::graph::{project, project_filtered, Artifact, NodeIndex, ProjectionFilter, RawGraph};

const ROOT_KEY: &str = "com.acme:app";

/// Shape of a random raw graph. Node `i + 1` is declared by `parents[i]`,
/// which is always lower, so declarations alone form a tree. `links` add
/// extra edges on top.
#[derive(Debug, Clone)]
struct GraphShape {
    parents: Vec<usize>,
    test_scoped: Vec<bool>,
    links: Vec<(usize, usize)>,
}

fn graph_shape(max_nodes: usize, acyclic: bool) -> impl Strategy<Value = GraphShape> {
    (1..=max_nodes).prop_flat_map(move |n| {
        (
            proptest::collection::vec(any::<usize>(), n),
            proptest::collection::vec(any::<bool>(), n),
            proptest::collection::vec((any::<usize>(), any::<usize>()), 0..n),
        )
            .prop_map(move |(raw_parents, test_scoped, raw_links)| {
                let parents = raw_parents
                    .iter()
                    .enumerate()
                    .map(|(i, p)| p % (i + 1))
                    .collect();
                // Links never point at the root; acyclic graphs only link
                // forward.
                let links = raw_links
                    .into_iter()
                    .map(|(a, b)| (a % (n + 1), b % n + 1))
                    .filter(|(from, to)| !acyclic || from < to)
                    .collect();
                GraphShape {
                    parents,
                    test_scoped,
                    links,
                }
            })
    })
}

fn build(shape: &GraphShape) -> (RawGraph, Vec<NodeIndex>) {
    let mut graph = RawGraph::new(Artifact::new("com.acme", "app", "1.0"));
    let mut ids = vec![graph.root()];
    for (i, parent) in shape.parents.iter().enumerate() {
        let scope = if shape.test_scoped[i] { "test" } else { "compile" };
        let artifact =
            Artifact::new("org.example", format!("n{}", i + 1), "1.0").with_scope(scope);
        let ix = graph.add_dependency(ids[*parent], artifact);
        ids.push(ix);
    }
    for (from, to) in &shape.links {
        graph.link(ids[*from], ids[*to]);
    }
    (graph, ids)
}

fn index_of(key: &str, ids: &[NodeIndex]) -> NodeIndex {
    let n: usize = key
        .strip_prefix("org.example:n")
        .and_then(|n| n.parse().ok())
        .unwrap_or_else(|| panic!("unexpected key {key}"));
    ids[n]
}

fn child_keys(graph: &RawGraph, ix: NodeIndex) -> Vec<String> {
    graph
        .children(ix)
        .into_iter()
        .map(|c| graph.artifact(c).unwrap().key())
        .collect()
}

/// Each tree node's children are exactly its graph children, in edge order.
fn mirrors_graph(
    graph: &RawGraph,
    ids: &[NodeIndex],
    nodes: &[DependencyNode],
    parent: NodeIndex,
) -> Result<(), TestCaseError> {
    let got: Vec<String> = nodes.iter().map(|n| n.key.clone()).collect();
    prop_assert_eq!(got, child_keys(graph, parent));
    for node in nodes {
        mirrors_graph(graph, ids, &node.children, index_of(&node.key, ids))?;
    }
    Ok(())
}

/// Number of occurrences below `ix`, i.e. paths from `ix` to any node.
fn occurrences(graph: &RawGraph, ix: NodeIndex) -> usize {
    graph
        .children(ix)
        .into_iter()
        .map(|c| 1 + occurrences(graph, c))
        .sum()
}

fn is_subsequence(sub: &[String], of: &[String]) -> bool {
    let mut rest = of.iter();
    sub.iter().all(|item| rest.any(|candidate| candidate == item))
}

/// Tree children are graph children in edge order, and no key repeats on a
/// root-to-leaf path.
fn respects_graph_and_path(
    graph: &RawGraph,
    ids: &[NodeIndex],
    nodes: &[DependencyNode],
    parent: NodeIndex,
    path: &mut Vec<String>,
) -> Result<(), TestCaseError> {
    let got: Vec<String> = nodes.iter().map(|n| n.key.clone()).collect();
    prop_assert!(is_subsequence(&got, &child_keys(graph, parent)));
    for node in nodes {
        prop_assert_ne!(node.key.as_str(), ROOT_KEY);
        prop_assert!(!path.contains(&node.key), "{} repeats on {:?}", node.key, path);
        path.push(node.key.clone());
        respects_graph_and_path(graph, ids, &node.children, index_of(&node.key, ids), path)?;
        path.pop();
    }
    Ok(())
}

fn count_scope(nodes: &[DependencyNode], scope: &str) -> usize {
    nodes
        .iter()
        .map(|n| usize::from(n.scope == scope) + count_scope(&n.children, scope))
        .sum()
}

fn leaves_have_scope_other_than(nodes: &[DependencyNode], scope: &str) -> bool {
    nodes.iter().all(|n| {
        if n.children.is_empty() {
            n.scope != scope
        } else {
            leaves_have_scope_other_than(&n.children, scope)
        }
    })
}

proptest! {
    #[test]
    fn dag_projection_mirrors_graph(shape in graph_shape(10, true)) {
        let (graph, ids) = build(&shape);

        let tree = project(&graph);

        mirrors_graph(&graph, &ids, &tree, graph.root())?;
        let total: usize = tree.iter().map(DependencyNode::size).sum();
        prop_assert_eq!(total, occurrences(&graph, graph.root()));
    }

    #[test]
    fn cyclic_projection_terminates_without_repeating_paths(shape in graph_shape(8, false)) {
        let (graph, ids) = build(&shape);

        let tree = project(&graph);

        respects_graph_and_path(&graph, &ids, &tree, graph.root(), &mut Vec::new())?;
    }

    #[test]
    fn scope_filter_keeps_every_interesting_occurrence(shape in graph_shape(10, true)) {
        let (graph, _) = build(&shape);
        let filter = ProjectionFilter::excluding_scopes(["test"]);

        let full = project(&graph);
        let filtered = project_filtered(&graph, &filter);

        prop_assert_eq!(count_scope(&filtered, "compile"), count_scope(&full, "compile"));
        prop_assert!(leaves_have_scope_other_than(&filtered, "test"));
    }

    #[test]
    fn encoding_survives_a_generic_reader(shape in graph_shape(10, false)) {
        let (graph, _) = build(&shape);
        let tree = project(&graph);

        let encoded = encode(&tree).unwrap();
        let decoded = decode(&encoded).unwrap();

        prop_assert_eq!(&decoded, &tree);
        prop_assert_eq!(encode(&decoded).unwrap(), encoded.clone());
        let generic: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        prop_assert_eq!(generic.as_array().map(Vec::len), Some(tree.len()));
    }
}
