//! Compiles the generator output for `schemas/shapes.json` and drives it
//! through a registry.
use anyhow::Result;
use json_marshal::runtime::RegistryBuilder;

mod shapes {
    include!(concat!(env!("OUT_DIR"), "/shapes.rs"));
}

use shapes::{Line, Point, Polygon};

fn main() -> Result<()> {
    let mut builder = RegistryBuilder::new();
    shapes::register_all(&mut builder)?;
    let registry = builder.build()?;

    let polygon = Polygon {
        name: Some("triangle".to_owned()),
        points: Some(vec![
            Some(Box::new(Point { x: 0, y: 0 })),
            Some(Box::new(Point { x: 4, y: 0 })),
            Some(Box::new(Point { x: 0, y: 3 })),
        ]),
        closed: true,
    };
    let text = registry.marshal("Polygon", Some(&polygon))?;
    println!("{text}");

    let back = registry.unmarshal_as::<Polygon>("Polygon", &text)?;
    assert_eq!(back.as_deref(), Some(&polygon));

    let line = Line { a: Some(Box::new(Point { x: 1, y: 1 })), b: None };
    println!("{}", registry.marshal("line_t", Some(&line))?);
    Ok(())
}
