// JVM field descriptors to Java type names
//
// `Lcom/app/A;`  -> com.app.A
// `[[I`          -> int[][]
// `Z`            -> boolean

/// Java type name for a field descriptor. Unknown input is returned unchanged.
pub fn type_name_of_descriptor(descriptor: &str) -> String {
    let element = descriptor.trim_start_matches('[');
    let dimensions = descriptor.len() - element.len();

    let base = match element {
        "Z" => "boolean".to_string(),
        "B" => "byte".to_string(),
        "C" => "char".to_string(),
        "S" => "short".to_string(),
        "I" => "int".to_string(),
        "J" => "long".to_string(),
        "F" => "float".to_string(),
        "D" => "double".to_string(),
        "V" => "void".to_string(),
        _ => match element.strip_prefix('L').and_then(|s| s.strip_suffix(';')) {
            Some(internal) => internal.replace('/', "."),
            None => return descriptor.to_string(),
        },
    };

    let mut name = base;
    for _ in 0..dimensions {
        name.push_str("[]");
    }
    name
}

/// Class token of a rendered method reference (`Lcom/app/A;->run()V`)
pub fn owner_of_method(method: &str) -> &str {
    method.split('-').next().unwrap_or(method)
}
