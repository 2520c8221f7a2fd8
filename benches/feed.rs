//! Benchmarks for feed assembly and like toggling.
//!
//! Run with: `cargo bench --bench feed`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use social_graph_kernel::{Engine, EngineConfig, MediaUpload, PostId, User, UserId};

/// Build an engine with `posts` approved posts spread over 16 authors,
/// a quarter of whom the viewer has blocked.
fn populated_engine(posts: usize) -> (Engine, UserId, Vec<PostId>) {
    let authors: Vec<UserId> = (0..16).map(|i| UserId::new(format!("author_{i}"))).collect();
    let mut config = EngineConfig::default();
    config.admin_ids.extend(authors.iter().cloned());

    let mut engine = Engine::in_memory(config);
    let mut viewer = User::new("viewer", "Viewer", "a");
    for (i, author) in authors.iter().enumerate() {
        engine.register_user(User::new(author.clone(), author.to_string(), "a"));
        if i % 4 == 0 {
            viewer.blocked_users.insert(author.clone());
        }
    }
    let viewer_id = viewer.id.clone();
    engine.register_user(viewer);

    let rt = tokio::runtime::Runtime::new().expect("runtime");
    let mut ids = Vec::with_capacity(posts);
    rt.block_on(async {
        for i in 0..posts {
            let media = MediaUpload::new("p.jpg", "image/jpeg", vec![0; 8]);
            let post = engine
                .create_post(&authors[i % authors.len()], Some(media), "bench")
                .await
                .expect("create post");
            ids.push(post.id);
        }
    });
    (engine, viewer_id, ids)
}

fn bench_list_feed(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_feed");

    for posts in [100usize, 1_000, 10_000] {
        let (engine, viewer, _) = populated_engine(posts);
        group.throughput(Throughput::Elements(posts as u64));
        group.bench_with_input(BenchmarkId::from_parameter(posts), &posts, |b, _| {
            b.iter(|| black_box(engine.list_feed(&viewer).map(|feed| feed.len())));
        });
    }

    group.finish();
}

fn bench_toggle_like(c: &mut Criterion) {
    let (mut engine, viewer, ids) = populated_engine(1_000);
    // Author 1 is not blocked by the viewer.
    let target = ids[1];

    c.bench_function("toggle_like", |b| {
        b.iter(|| black_box(engine.toggle_like(&target, &viewer).map(|o| o.liked)));
    });
}

criterion_group!(benches, bench_list_feed, bench_toggle_like);
criterion_main!(benches);
