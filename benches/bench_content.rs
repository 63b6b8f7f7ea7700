use archetype_content::{
    BlobContent, BlobLoader, ContentManager, FileSystem, GraphicsDevice, MemoryFileSystem,
    TextureLoader, TracingLogger,
};
use archetype_content::Texture;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::rc::Rc;

fn blob_manager(count: usize) -> ContentManager {
    let fs = Rc::new(MemoryFileSystem::new());
    for i in 0..count {
        fs.insert(&format!("assets://data/blob_{i}.bin"), vec![0u8; 1024]);
    }
    let fs: Rc<dyn FileSystem> = fs;
    let mut manager = ContentManager::new(Rc::new(TracingLogger));
    manager.add_loader(BlobLoader::new(fs));
    manager
}

fn bench_load_100_blobs(c: &mut Criterion) {
    c.bench_function("load_100_blobs", |b| {
        b.iter(|| {
            let mut manager = blob_manager(100);
            for i in 0..100 {
                let blob = manager
                    .get::<BlobContent>(&format!("assets://data/blob_{i}.bin"), None)
                    .unwrap();
                manager.free(&blob);
            }
            black_box(manager);
        })
    });
}

fn bench_cached_get_free(c: &mut Criterion) {
    c.bench_function("cached_get_free", |b| {
        let mut manager = blob_manager(50);
        let held: Vec<_> = (0..50)
            .map(|i| {
                manager
                    .get::<BlobContent>(&format!("assets://data/blob_{i}.bin"), None)
                    .unwrap()
            })
            .collect();

        b.iter(|| {
            for i in 0..50 {
                let name = format!("assets://data/blob_{i}.bin");
                let blob = manager.get::<BlobContent>(&name, None).unwrap();
                manager.free(black_box(&blob));
            }
        });

        for blob in &held {
            manager.free(blob);
        }
    });
}

fn bench_texture_context_round_trip(c: &mut Criterion) {
    c.bench_function("texture_context_round_trip_10x64", |b| {
        let fs = Rc::new(MemoryFileSystem::new());
        let image = RgbaImage::from_pixel(64, 64, Rgba([255, 255, 255, 255]));
        let mut png = Cursor::new(Vec::new());
        image.write_to(&mut png, ImageFormat::Png).unwrap();
        for i in 0..10 {
            fs.insert(&format!("assets://textures/tex_{i}.png"), png.get_ref().clone());
        }

        let device = GraphicsDevice::headless();
        let fs: Rc<dyn FileSystem> = fs;
        let mut manager = ContentManager::new(Rc::new(TracingLogger));
        manager.add_loader(TextureLoader::new(fs, device.clone()));
        let textures: Vec<_> = (0..10)
            .map(|i| {
                manager
                    .get::<Texture>(&format!("assets://textures/tex_{i}.png"), None)
                    .unwrap()
            })
            .collect();

        b.iter(|| {
            device.lose_context(&mut manager);
            device.restore_context(&mut manager);
            black_box(device.live_objects());
        });

        for texture in &textures {
            manager.free(texture);
        }
    });
}

criterion_group!(
    benches,
    bench_load_100_blobs,
    bench_cached_get_free,
    bench_texture_context_round_trip
);
criterion_main!(benches);
