// Generated by json-marshal from: shapes.h, sample.h
// Do not edit by hand.

#[allow(unused_imports)]
use json_marshal::runtime::{self as rt, Slot as _};

// file: shapes.h

// record: Point

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

pub fn marshal_point(registry: &rt::Registry, value: Option<&dyn rt::Any>) -> rt::Result<rt::Value> {
    let Some(value) = value else {
        return Ok(rt::Value::Null);
    };
    let d = rt::downcast::<Point>(value)?;
    let mut object = rt::Map::new();
    object.insert("x".to_owned(), rt::marshal_value(registry, "int", Some(&d.x as &dyn rt::Any))?);
    object.insert("y".to_owned(), rt::marshal_value(registry, "int", Some(&d.y as &dyn rt::Any))?);
    Ok(rt::Value::Object(object))
}

pub fn unmarshal_point(registry: &rt::Registry, value: &rt::Value) -> rt::Result<Option<Box<dyn rt::Any>>> {
    let object = rt::expect_object(value, "Point")?;
    let mut d = Point::default();
    d.x = rt::unmarshal_required(registry, "int", object, "x")?;
    d.y = rt::unmarshal_required(registry, "int", object, "y")?;
    Ok(Some(Box::new(d) as Box<dyn rt::Any>))
}

pub fn free_point(_registry: &rt::Registry, value: &mut dyn rt::Any) -> rt::Result<()> {
    rt::downcast_mut::<Point>(value)?;
    Ok(())
}

pub fn register_point(builder: &mut rt::RegistryBuilder) -> rt::Result<()> {
    builder.register(
        rt::Record::new(["Point"], vec![
            rt::Field::new("x", rt::FieldType::value("int")),
            rt::Field::new("y", rt::FieldType::value("int")),
        ]),
        std::mem::size_of::<Point>(),
        marshal_point,
        unmarshal_point,
        free_point,
    )
}

// record: Line

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    pub a: Option<Box<Point>>,
    pub b: Option<Box<Point>>,
}

pub fn marshal_line(registry: &rt::Registry, value: Option<&dyn rt::Any>) -> rt::Result<rt::Value> {
    let Some(value) = value else {
        return Ok(rt::Value::Null);
    };
    let d = rt::downcast::<Line>(value)?;
    let mut object = rt::Map::new();
    object.insert("a".to_owned(), rt::marshal_value(registry, "Point", d.a.as_dyn())?);
    object.insert("b".to_owned(), rt::marshal_value(registry, "Point", d.b.as_dyn())?);
    Ok(rt::Value::Object(object))
}

pub fn unmarshal_line(registry: &rt::Registry, value: &rt::Value) -> rt::Result<Option<Box<dyn rt::Any>>> {
    let object = rt::expect_object(value, "Line")?;
    let mut d = Line::default();
    d.a = rt::unmarshal_slot(registry, "Point", object, "a")?;
    d.b = rt::unmarshal_slot(registry, "Point", object, "b")?;
    Ok(Some(Box::new(d) as Box<dyn rt::Any>))
}

pub fn free_line(registry: &rt::Registry, value: &mut dyn rt::Any) -> rt::Result<()> {
    let d = rt::downcast_mut::<Line>(value)?;
    rt::free_value(registry, "Point", d.a.take().into_dyn())?;
    rt::free_value(registry, "Point", d.b.take().into_dyn())?;
    Ok(())
}

pub fn register_line(builder: &mut rt::RegistryBuilder) -> rt::Result<()> {
    builder.register(
        rt::Record::new(["Line"], vec![
            rt::Field::new("a", rt::FieldType::pointer("Point")),
            rt::Field::new("b", rt::FieldType::pointer("Point")),
        ]),
        std::mem::size_of::<Line>(),
        marshal_line,
        unmarshal_line,
        free_line,
    )
}

// record: Polygon

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    pub name: Option<String>,
    pub points: Option<Vec<Option<Box<Point>>>>,
    pub closed: bool,
}

pub fn marshal_polygon(registry: &rt::Registry, value: Option<&dyn rt::Any>) -> rt::Result<rt::Value> {
    let Some(value) = value else {
        return Ok(rt::Value::Null);
    };
    let d = rt::downcast::<Polygon>(value)?;
    let mut object = rt::Map::new();
    object.insert("name".to_owned(), rt::marshal_value(registry, "string", d.name.as_dyn())?);
    object.insert("points".to_owned(), rt::marshal_array_value(registry, "Point", d.points.as_deref())?);
    object.insert("closed".to_owned(), rt::marshal_value(registry, "bool", Some(&d.closed as &dyn rt::Any))?);
    Ok(rt::Value::Object(object))
}

pub fn unmarshal_polygon(registry: &rt::Registry, value: &rt::Value) -> rt::Result<Option<Box<dyn rt::Any>>> {
    let object = rt::expect_object(value, "Polygon")?;
    let mut d = Polygon::default();
    d.name = rt::unmarshal_slot(registry, "string", object, "name")?;
    d.points = rt::unmarshal_array_field(registry, "Point", object, "points")?;
    d.closed = rt::unmarshal_required(registry, "bool", object, "closed")?;
    Ok(Some(Box::new(d) as Box<dyn rt::Any>))
}

pub fn free_polygon(registry: &rt::Registry, value: &mut dyn rt::Any) -> rt::Result<()> {
    let d = rt::downcast_mut::<Polygon>(value)?;
    rt::free_value(registry, "string", d.name.take().into_dyn())?;
    rt::free_array(registry, "Point", d.points.take())?;
    Ok(())
}

pub fn register_polygon(builder: &mut rt::RegistryBuilder) -> rt::Result<()> {
    builder.register(
        rt::Record::new(["Polygon"], vec![
            rt::Field::new("name", rt::FieldType::value("string")),
            rt::Field::new("points", rt::FieldType::array("Point")),
            rt::Field::new("closed", rt::FieldType::value("bool")),
        ]),
        std::mem::size_of::<Polygon>(),
        marshal_polygon,
        unmarshal_polygon,
        free_polygon,
    )
}

// file: sample.h

// record: struct sample

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructSample {
    pub c: i8,
    pub s: i16,
    pub i: i32,
    pub l: i64,
    pub ll: i64,
    pub f: f32,
    pub dbl: f64,
    pub flag: bool,
    pub label: Option<String>,
    pub count: Option<Box<i32>>,
    pub tags: Option<Vec<Option<String>>>,
    pub weights: Option<Vec<Option<Box<f64>>>>,
    pub origin: Point,
    pub r#type: i32,
}

pub fn marshal_struct_sample(registry: &rt::Registry, value: Option<&dyn rt::Any>) -> rt::Result<rt::Value> {
    let Some(value) = value else {
        return Ok(rt::Value::Null);
    };
    let d = rt::downcast::<StructSample>(value)?;
    let mut object = rt::Map::new();
    object.insert("c".to_owned(), rt::marshal_value(registry, "char", Some(&d.c as &dyn rt::Any))?);
    object.insert("s".to_owned(), rt::marshal_value(registry, "short", Some(&d.s as &dyn rt::Any))?);
    object.insert("i".to_owned(), rt::marshal_value(registry, "int", Some(&d.i as &dyn rt::Any))?);
    object.insert("l".to_owned(), rt::marshal_value(registry, "long", Some(&d.l as &dyn rt::Any))?);
    object.insert("ll".to_owned(), rt::marshal_value(registry, "long long", Some(&d.ll as &dyn rt::Any))?);
    object.insert("f".to_owned(), rt::marshal_value(registry, "float", Some(&d.f as &dyn rt::Any))?);
    object.insert("dbl".to_owned(), rt::marshal_value(registry, "double", Some(&d.dbl as &dyn rt::Any))?);
    object.insert("flag".to_owned(), rt::marshal_value(registry, "bool", Some(&d.flag as &dyn rt::Any))?);
    object.insert("label".to_owned(), rt::marshal_value(registry, "string", d.label.as_dyn())?);
    object.insert("count".to_owned(), rt::marshal_value(registry, "int", d.count.as_dyn())?);
    object.insert("tags".to_owned(), rt::marshal_array_value(registry, "string", d.tags.as_deref())?);
    object.insert("weights".to_owned(), rt::marshal_array_value(registry, "double", d.weights.as_deref())?);
    object.insert("origin".to_owned(), rt::marshal_value(registry, "Point", Some(&d.origin as &dyn rt::Any))?);
    object.insert("type".to_owned(), rt::marshal_value(registry, "int", Some(&d.r#type as &dyn rt::Any))?);
    Ok(rt::Value::Object(object))
}

pub fn unmarshal_struct_sample(registry: &rt::Registry, value: &rt::Value) -> rt::Result<Option<Box<dyn rt::Any>>> {
    let object = rt::expect_object(value, "struct sample")?;
    let mut d = StructSample::default();
    d.c = rt::unmarshal_required(registry, "char", object, "c")?;
    d.s = rt::unmarshal_required(registry, "short", object, "s")?;
    d.i = rt::unmarshal_required(registry, "int", object, "i")?;
    d.l = rt::unmarshal_required(registry, "long", object, "l")?;
    d.ll = rt::unmarshal_required(registry, "long long", object, "ll")?;
    d.f = rt::unmarshal_required(registry, "float", object, "f")?;
    d.dbl = rt::unmarshal_required(registry, "double", object, "dbl")?;
    d.flag = rt::unmarshal_required(registry, "bool", object, "flag")?;
    d.label = rt::unmarshal_slot(registry, "string", object, "label")?;
    d.count = rt::unmarshal_slot(registry, "int", object, "count")?;
    d.tags = rt::unmarshal_array_field(registry, "string", object, "tags")?;
    d.weights = rt::unmarshal_array_field(registry, "double", object, "weights")?;
    d.origin = rt::unmarshal_required(registry, "Point", object, "origin")?;
    d.r#type = rt::unmarshal_required(registry, "int", object, "type")?;
    Ok(Some(Box::new(d) as Box<dyn rt::Any>))
}

pub fn free_struct_sample(registry: &rt::Registry, value: &mut dyn rt::Any) -> rt::Result<()> {
    let d = rt::downcast_mut::<StructSample>(value)?;
    rt::free_value(registry, "string", d.label.take().into_dyn())?;
    rt::free_value(registry, "int", d.count.take().into_dyn())?;
    rt::free_array(registry, "string", d.tags.take())?;
    rt::free_array(registry, "double", d.weights.take())?;
    rt::release_value(registry, "Point", Some(&mut d.origin as &mut dyn rt::Any))?;
    Ok(())
}

pub fn register_struct_sample(builder: &mut rt::RegistryBuilder) -> rt::Result<()> {
    builder.register(
        rt::Record::new(["struct sample", "sample_t"], vec![
            rt::Field::new("c", rt::FieldType::value("char")),
            rt::Field::new("s", rt::FieldType::value("short")),
            rt::Field::new("i", rt::FieldType::value("int")),
            rt::Field::new("l", rt::FieldType::value("long")),
            rt::Field::new("ll", rt::FieldType::value("long long")),
            rt::Field::new("f", rt::FieldType::value("float")),
            rt::Field::new("dbl", rt::FieldType::value("double")),
            rt::Field::new("flag", rt::FieldType::value("bool")),
            rt::Field::new("label", rt::FieldType::value("string")),
            rt::Field::new("count", rt::FieldType::pointer("int")),
            rt::Field::new("tags", rt::FieldType::array("string")),
            rt::Field::new("weights", rt::FieldType::array("double")),
            rt::Field::new("origin", rt::FieldType::value("Point")),
            rt::Field::new("type", rt::FieldType::value("int")),
        ]),
        std::mem::size_of::<StructSample>(),
        marshal_struct_sample,
        unmarshal_struct_sample,
        free_struct_sample,
    )
}

pub fn register_all(builder: &mut rt::RegistryBuilder) -> rt::Result<()> {
    register_point(builder)?;
    register_line(builder)?;
    register_polygon(builder)?;
    register_struct_sample(builder)?;
    Ok(())
}
