use super::*;
use crate::linalg::vec4::Vec4;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_store").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

#[test]
fn fs_store_writes_png_and_creates_parent_dirs() {
    let dir = scratch_dir("write");
    let path = dir.join("nested").join("out.png");
    let img = FloatImage::filled(3, 2, Vec4::new(1.0, 0.5, 0.0, 1.0));

    let mut store = FsImageStore::new();
    store.store(&path, &img).unwrap();
    assert!(path.is_file());

    let back = store.load(&path).unwrap();
    assert_eq!((back.width(), back.height()), (3, 2));
    assert_eq!(back.to_rgba8(), img.to_rgba8());
}

#[test]
fn fs_store_load_missing_file_names_the_path() {
    let dir = scratch_dir("missing");
    let path = dir.join("nope.png");
    let err = FsImageStore::new().load(&path).unwrap_err();
    let msg = err.to_string();
    assert!(msg.starts_with("io error:"), "{msg}");
    assert!(msg.contains("nope.png"), "{msg}");
}

#[test]
fn fs_store_load_rejects_non_image_bytes() {
    let dir = scratch_dir("garbage");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("garbage.png");
    std::fs::write(&path, b"definitely not png").unwrap();

    let err = FsImageStore::new().load(&path).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("decode image"), "{msg}");
    assert!(msg.contains("garbage.png"), "{msg}");
}

#[test]
fn memory_store_quantizes_like_png() {
    let mut store = InMemoryImageStore::new();
    let img = FloatImage::filled(1, 1, Vec4::new(-0.01, 0.5, 2.0, f32::NAN));
    store.store(Path::new("out.png"), &img).unwrap();

    let back = store.load(Path::new("out.png")).unwrap();
    assert_eq!(back.to_rgba8(), vec![3, 128, 255, 0]);
    assert_eq!(store.len(), 1);
}

#[test]
fn memory_store_missing_path_is_io_error() {
    let mut store = InMemoryImageStore::new();
    assert!(store.is_empty());
    let err = store.load(Path::new("a.png")).unwrap_err();
    assert!(matches!(err, ImgOpError::Io(_)));
}
