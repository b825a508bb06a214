use std::fmt;

use crate::{
    codegen::Renderer,
    types::{AnnotatedTypeName, ArrayLength, PrivacyAnnotation, TypeName},
};

impl Renderer<'_> {
    pub(super) fn type_name(&self, t: &TypeName) -> String {
        type_text(t, self.options.backend)
    }

    pub(super) fn annotated_type(&self, t: &AnnotatedTypeName) -> String {
        annotated_text(t, self.options.backend)
    }
}

fn type_text(t: &TypeName, backend: bool) -> String {
    if let Some(name) = t.elementary_name() {
        return name;
    }
    match t {
        TypeName::Enum(u) | TypeName::EnumValue(u) | TypeName::Struct(u) | TypeName::Contract(u) => {
            u.names.join(".")
        }
        TypeName::Mapping(m) => {
            let label = match &m.key_label {
                Some(label) if !backend => format!("!{label}"),
                _ => String::new(),
            };
            format!(
                "mapping({}{label} => {})",
                type_text(&m.key_type, backend),
                annotated_text(&m.value_type, backend)
            )
        }
        TypeName::Array(a) => {
            let length = match &a.length {
                Some(ArrayLength::Fixed(n)) => n.to_string(),
                Some(ArrayLength::Named(name)) => name.clone(),
                None => String::new(),
            };
            format!("{}[{length}]", annotated_text(&a.value_type, backend))
        }
        TypeName::Tuple(tuple) => format!("({})", annotated_list(&tuple.types, backend)),
        TypeName::Function(f) => {
            let mut out = format!("function({})", annotated_list(&f.parameters, backend));
            if !f.modifiers.is_empty() {
                out.push(' ');
                out.push_str(&f.modifiers.join(" "));
            }
            if !f.returns.is_empty() {
                out.push_str(&format!(" returns ({})", annotated_list(&f.returns, backend)));
            }
            out
        }
        // covered by elementary_name
        other => format!("{other:?}"),
    }
}

fn annotated_list(types: &[AnnotatedTypeName], backend: bool) -> String {
    types
        .iter()
        .map(|t| annotated_text(t, backend))
        .collect::<Vec<_>>()
        .join(", ")
}

fn annotated_text(t: &AnnotatedTypeName, backend: bool) -> String {
    let type_name = type_text(&t.type_name, backend);
    if t.had_annotation && !backend {
        format!("{type_name}@{}", t.privacy)
    } else {
        type_name
    }
}

impl fmt::Display for PrivacyAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrivacyAnnotation::All => write!(f, "all"),
            PrivacyAnnotation::Me => write!(f, "me"),
            PrivacyAnnotation::Tee => write!(f, "tee"),
            PrivacyAnnotation::Named { name, .. } => write!(f, "{name}"),
            PrivacyAnnotation::Components(labels) => {
                let labels: Vec<String> = labels.iter().map(ToString::to_string).collect();
                write!(f, "({})", labels.join(", "))
            }
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&type_text(self, false))
    }
}

impl fmt::Display for AnnotatedTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&annotated_text(self, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ArrayType, FunctionType, MappingType, NumericType, TupleType, UserDefinedType};

    fn mapping(label: Option<&str>) -> TypeName {
        TypeName::Mapping(Box::new(MappingType::new(
            TypeName::Address,
            label.map(str::to_string),
            AnnotatedTypeName::new(TypeName::uint(), Some(PrivacyAnnotation::named("k"))),
        )))
    }

    #[test]
    fn test_mapping_label() {
        assert_eq!(mapping(Some("k")).to_string(), "mapping(address!k => uint@k)");
        assert_eq!(type_text(&mapping(Some("k")), true), "mapping(address => uint)");
        assert_eq!(mapping(None).to_string(), "mapping(address => uint@k)");
    }

    #[test]
    fn test_annotation_printed_only_when_written() {
        let implicit = AnnotatedTypeName::new(TypeName::Bool, None);
        let explicit = AnnotatedTypeName::all(TypeName::Bool);
        assert_eq!(implicit.to_string(), "bool");
        assert_eq!(explicit.to_string(), "bool@all");
        assert_eq!(annotated_text(&explicit, true), "bool");
        assert_eq!(AnnotatedTypeName::me(TypeName::uint()).to_string(), "uint@me");
    }

    #[test]
    fn test_compound_spellings() {
        let fixed = AnnotatedTypeName::array_all(AnnotatedTypeName::uint_all(), &[3]);
        assert_eq!(fixed.to_string(), "uint[3]");
        assert_eq!(TypeName::dyn_uint_array().to_string(), "uint[]");

        let tuple = TypeName::Tuple(TupleType::new(vec![
            AnnotatedTypeName::uint_all(),
            AnnotatedTypeName::me(TypeName::Bool),
        ]));
        assert_eq!(tuple.to_string(), "(uint, bool@me)");

        let user = TypeName::Struct(UserDefinedType::new(vec!["Lib".into(), "Point".into()], None));
        assert_eq!(user.to_string(), "Lib.Point");

        let function = TypeName::Function(Box::new(FunctionType {
            parameters: vec![AnnotatedTypeName::uint_all()],
            modifiers: vec!["view".into()],
            returns: vec![AnnotatedTypeName::bool_all()],
        }));
        assert_eq!(function.to_string(), "function(uint) view returns (bool)");

        let named = TypeName::Array(Box::new(ArrayType::new(
            AnnotatedTypeName::new(TypeName::Numeric(NumericType::uint(Some(8))), None),
            Some(ArrayLength::Named("N".into())),
        )));
        assert_eq!(named.to_string(), "uint8[N]");
    }
}
