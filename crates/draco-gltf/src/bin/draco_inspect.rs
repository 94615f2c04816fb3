//! Print what a Draco blob or a glTF file with compressed primitives holds.
//!
//! Run: `cargo run -p draco-gltf --features tools --bin draco-inspect -- <file>`
//!
//! `.drc` files are decoded as a mesh or point cloud, whichever the header
//! declares. `.gltf` and `.glb` files have every compressed primitive decoded
//! and each of its attributes resolved. Set `RUST_LOG=debug` to see why a
//! decode fails.

use std::env;
use std::fs;
use std::path::Path;
use std::process;

use draco_gltf::draco_decode::{
    AttributeBuffer, Decoder, EncodedGeometryType, PointCloud, probe_geometry_kind,
};
use draco_gltf::{Document, PrimitiveExt};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("usage: draco-inspect <file.drc|file.gltf|file.glb>");
        process::exit(2);
    };
    let path = Path::new(&path);

    let result = match path.extension().and_then(|e| e.to_str()) {
        Some("gltf" | "glb") => inspect_gltf(path),
        _ => inspect_blob(path),
    };
    if let Err(e) = result {
        eprintln!("{}: {e}", path.display());
        process::exit(1);
    }
}

fn inspect_blob(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(path)?;
    let decoder = Decoder::new();
    match probe_geometry_kind(&data) {
        EncodedGeometryType::TriangularMesh => {
            let mesh = decoder.decode_mesh(&data)?;
            println!("mesh: {} points, {} faces", mesh.num_points(), mesh.num_faces());
            let faces = mesh.face_slice();
            println!("first faces: {:?}", &faces[..faces.len().min(4)]);
            print_attributes(&mesh);
        }
        EncodedGeometryType::PointCloud => {
            let pc = decoder.decode_point_cloud(&data)?;
            println!("point cloud: {} points", pc.num_points());
            print_attributes(&pc);
        }
        EncodedGeometryType::Invalid => {
            // Decoding reports why the header is unusable.
            decoder.decode_mesh(&data)?;
        }
    }
    Ok(())
}

fn print_attributes(pc: &PointCloud) {
    for attr in pc.attrs() {
        println!(
            "  {} {:?}: {} x {}{}",
            attr.unique_id(),
            attr.attribute_type(),
            attr.data_type(),
            attr.num_components(),
            if attr.normalized() { " (normalized)" } else { "" },
        );
        if let Some(name) = pc
            .metadata()
            .and_then(|m| m.attribute_metadata(attr.unique_id()))
            .and_then(|m| m.entry_str("name"))
        {
            println!("    name: {name}");
        }
    }
}

fn summary(buffer: &AttributeBuffer) -> String {
    let data_type = buffer.data_type();
    let bytes = buffer.len() * data_type.size().unwrap_or(0);
    format!("{} x {data_type} ({bytes} bytes)", buffer.len())
}

fn inspect_gltf(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let document = Document::from_path(path)?;
    let mut compressed = 0;

    for mesh in document.gltf().meshes() {
        for primitive in mesh.primitives() {
            let Some(decoded) = document.read_primitive(&primitive)? else {
                continue;
            };
            compressed += 1;
            let ext = PrimitiveExt::from_primitive(&primitive).unwrap_or_default();
            println!(
                "mesh {} primitive {}: {} indices",
                mesh.index(),
                primitive.index(),
                decoded.indices.len()
            );
            for (name, data) in &decoded.attributes {
                let source = if ext.attributes.contains_key(name) {
                    "compressed"
                } else {
                    "accessor"
                };
                match data {
                    Ok((buffer, true)) => println!("  {name} [{source}]: {}", summary(buffer)),
                    Ok((buffer, false)) => {
                        println!("  {name} [{source}]: {} (incomplete)", summary(buffer));
                    }
                    Err(e) => println!("  {name} [{source}]: {e}"),
                }
            }
        }
    }

    println!("{compressed} compressed primitive(s)");
    Ok(())
}
