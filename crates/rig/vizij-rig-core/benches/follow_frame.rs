use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vizij_rig_core::{
    Alignment, ContainerSize, ContentBounds, Fit, FitMode, FollowConfig, FollowController,
    Skeleton, SkeletonData,
};
use vizij_test_fixtures::rigs;

fn bench_follow_frame(c: &mut Criterion) {
    let data: SkeletonData = rigs::load("aim-rig").expect("rig fixture");
    let mut skel = Skeleton::new(data).expect("valid rig");
    let ctrl = FollowController::new(FollowConfig {
        fit: FitMode::Aligned {
            bounds: ContentBounds::new(-200.0, -20.0, 500.0, 700.0),
            fit: Fit::Contain,
            alignment: Alignment::CenterLeft,
        },
        ..FollowConfig::default()
    });
    let mut input = ctrl.pointer_input();
    input.drag_start(120.0, 80.0);
    let container = ContainerSize::new(400.0, 600.0);

    c.bench_function("pose_and_follow_aim_rig", |b| {
        b.iter(|| {
            input.drag_move(0.5, -0.5);
            skel.update_world_transforms();
            black_box(ctrl.after_world_transforms(&mut skel, black_box(container)))
        })
    });
}

criterion_group!(benches, bench_follow_frame);
criterion_main!(benches);
