use iai_callgrind::{black_box, library_benchmark, library_benchmark_group, main};
use kinship::tree::{GenealogyTree, RelationshipId, TreeNodeId};

// Setup: every node gets up to three children in insertion order, every
// fifth node a mate.
fn build_tree(size: usize) -> GenealogyTree<usize> {
    let mut tree = GenealogyTree::new(0);
    let mut hierarchy: Vec<TreeNodeId> = vec![tree.root()];
    for i in 1..size {
        let at = hierarchy[(i - 1) / 3];
        if i % 5 == 0 {
            tree.add_mate(i, RelationshipId(i), at).unwrap();
        } else {
            hierarchy.push(tree.add_node(i, at).unwrap());
        }
    }
    tree
}

fn print_len(len: usize) {
    println!("nodes: {len}");
}

#[library_benchmark]
#[bench::small(args = [64], setup = build_tree, teardown = print_len)]
#[bench::large(args = [10000], setup = build_tree, teardown = print_len)]
fn bench_all_nodes_with_mates(tree: GenealogyTree<usize>) -> usize {
    black_box(tree.all_nodes_with_mates().len())
}

#[library_benchmark]
#[bench::small(args = [64], setup = build_tree)]
#[bench::large(args = [10000], setup = build_tree)]
fn bench_depth_and_width(tree: GenealogyTree<usize>) -> (usize, usize) {
    black_box((tree.depth(), tree.width()))
}

#[library_benchmark]
#[bench::small(args = [64], setup = build_tree)]
#[bench::large(args = [10000], setup = build_tree)]
fn bench_find_last(tree: GenealogyTree<usize>) -> Option<TreeNodeId> {
    let last = tree.all_payloads().into_iter().copied().max().unwrap_or(0);
    black_box(tree.find(&last))
}

#[library_benchmark]
#[bench::small(args = [64], setup = build_tree)]
#[bench::large(args = [10000], setup = build_tree)]
fn bench_parent_above_root(mut tree: GenealogyTree<usize>) -> TreeNodeId {
    black_box(tree.add_parent(usize::MAX, None).unwrap())
}

library_benchmark_group!(
    name = enumerate_group;
    compare_by_id = true;

    benchmarks =
        bench_all_nodes_with_mates,
        bench_depth_and_width,
        bench_find_last,
        bench_parent_above_root
);

main!(library_benchmark_groups = enumerate_group);
