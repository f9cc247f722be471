//! Host-side planning cost of a binary dispatch
//!
//! Measures classify → collapse → plan → name → launch geometry, i.e. all
//! work done per call before the backend is involved.

use binop_dispatch::array::{ArrayDesc, broadcast_shapes};
use binop_dispatch::binary::{BinaryOpType, DispatchPlan, GENERAL_GROUP_SIZE, binary_output_layout};
use binop_dispatch::dtype::DType;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

fn plan_once(a: &ArrayDesc, b: &ArrayDesc) -> usize {
    let shape = broadcast_shapes(a.shape(), b.shape()).unwrap();
    let a = a.broadcast_to(&shape).unwrap();
    let b = b.broadcast_to(&shape).unwrap();
    let op_type = BinaryOpType::classify(a.layout(), b.layout());
    let out = ArrayDesc::new(0, a.dtype(), binary_output_layout(op_type, a.layout(), b.layout()));
    let plan = DispatchPlan::new(op_type, &a, &b, &out);
    let name = plan.kernel_key("add", a.dtype()).name();
    let geometry = plan.launch_geometry(&out, GENERAL_GROUP_SIZE).unwrap();
    name.len() + geometry.trailing.len()
}

// =============================================================================
// Benchmark: planning per category
// =============================================================================

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_plan");

    let cases = [
        ("vv", ArrayDesc::contiguous(1, DType::F32, &[1024, 1024]), ArrayDesc::contiguous(2, DType::F32, &[1024, 1024])),
        ("sv", ArrayDesc::contiguous(1, DType::F32, &[1]), ArrayDesc::contiguous(2, DType::F32, &[1024, 1024])),
        ("g2", ArrayDesc::contiguous(1, DType::F32, &[1024, 1024]), ArrayDesc::contiguous(2, DType::F32, &[1, 1024])),
        ("gn", ArrayDesc::contiguous(1, DType::F32, &[8, 1, 16, 1, 32]), ArrayDesc::contiguous(2, DType::F32, &[1, 4, 1, 8, 1])),
    ];

    for (label, a, b) in &cases {
        group.bench_with_input(BenchmarkId::from_parameter(label), &(a, b), |bench, (a, b)| {
            bench.iter(|| plan_once(black_box(a), black_box(b)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_plan);
criterion_main!(benches);
