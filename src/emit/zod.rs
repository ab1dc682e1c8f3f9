//! Translation of declarations into zod schema expressions.

use crate::base::constants::SCHEMA_SUFFIX;
use crate::hir::{Declaration, DeclarationKind, Module};
use crate::parser::SyntaxKind;
use crate::parser::ast::{
    InterfaceDecl, LiteralType, ObjectType, TupleType, Type, TypeMember, TypeRef,
};

/// How schema constant names are derived from declaration names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum NameStyle {
    /// The declaration name as written: `userId` -> `userIdSchema`.
    #[default]
    Keep,
    /// Lower-case first letter: `User` -> `userSchema`.
    Camel,
    /// Upper-case first letter: `user` -> `UserSchema`.
    Pascal,
}

impl NameStyle {
    /// Schema constant name for a declaration or binding name.
    pub fn schema_name(self, name: &str) -> String {
        let mut chars = name.chars();
        let Some(first) = chars.next() else {
            return SCHEMA_SUFFIX.to_string();
        };
        let rest = chars.as_str();
        match self {
            Self::Keep => format!("{name}{SCHEMA_SUFFIX}"),
            Self::Camel => format!("{}{rest}{SCHEMA_SUFFIX}", first.to_lowercase()),
            Self::Pascal => format!("{}{rest}{SCHEMA_SUFFIX}", first.to_uppercase()),
        }
    }
}

/// Schema constant name under the default style.
pub fn schema_name(name: &str) -> String {
    NameStyle::Keep.schema_name(name)
}

/// Object key as written in generated code: bare when it is an identifier.
pub fn object_key(key: &str) -> String {
    let mut chars = key.chars();
    let is_identifier = chars
        .next()
        .is_some_and(|c| unicode_ident::is_xid_start(c) || c == '_' || c == '$')
        && chars.all(|c| unicode_ident::is_xid_continue(c) || c == '$');
    if is_identifier {
        key.to_string()
    } else {
        format!("\"{}\"", key.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

/// Translated members of an object type or interface body.
#[derive(Debug, Default)]
struct Shape {
    fields: Vec<String>,
    /// Key and value schema of the last index signature.
    index: Option<(String, String)>,
}

impl Shape {
    fn render(self) -> String {
        match self.index {
            Some((key, value)) if self.fields.is_empty() => format!("z.record({key}, {value})"),
            Some((_, value)) => {
                format!("z.object({{ {} }}).catchall({value})", self.fields.join(", "))
            }
            None if self.fields.is_empty() => "z.object({})".to_string(),
            None => format!("z.object({{ {} }})", self.fields.join(", ")),
        }
    }
}

/// Translates the declarations of one consolidated module.
///
/// Names resolve against the module's own declarations and import bindings.
/// Constructs without a zod counterpart become `z.unknown()` and mark the
/// translation as lossy.
pub struct Translator<'a> {
    module: &'a Module,
    style: NameStyle,
    lossy: bool,
}

impl<'a> Translator<'a> {
    pub fn new(module: &'a Module) -> Self {
        Self::with_style(module, NameStyle::default())
    }

    pub fn with_style(module: &'a Module, style: NameStyle) -> Self {
        Self {
            module,
            style,
            lossy: false,
        }
    }

    /// Translate one declaration. The flag is true when part of it was
    /// emitted as `z.unknown()`.
    pub fn declaration(&mut self, declaration: &Declaration) -> (String, bool) {
        self.lossy = false;
        let expr = match &declaration.kind {
            DeclarationKind::Enum(decl) => {
                // no runtime object to validate against
                if decl.is_const() || decl.is_declare() {
                    self.lossy = true;
                }
                format!("z.nativeEnum({})", declaration.name)
            }
            DeclarationKind::TypeAlias(alias) => match alias.ty() {
                Some(ty) => self.ty(&ty),
                None => self.unknown(),
            },
            DeclarationKind::Interface(interface) => self.interface(interface),
        };
        (expr, self.lossy)
    }

    fn unknown(&mut self) -> String {
        self.lossy = true;
        "z.unknown()".to_string()
    }

    fn is_known(&self, name: &str) -> bool {
        self.module.local_declaration(name).is_some() || self.module.import(name).is_some()
    }

    fn interface(&mut self, interface: &InterfaceDecl) -> String {
        let shape = match interface.body() {
            Some(body) => self.shape(&body),
            None => Shape::default(),
        };

        let mut bases = Vec::new();
        for heritage in interface.extends() {
            match heritage.entity_name() {
                Some(name) if !name.is_qualified() => {
                    let base = name.first_segment().unwrap_or_default();
                    if self.is_known(&base) {
                        bases.push(self.style.schema_name(&base));
                    } else {
                        self.lossy = true;
                    }
                }
                _ => self.lossy = true,
            }
        }

        let Some(expr) = bases.into_iter().reduce(|acc, base| format!("{acc}.merge({base})")) else {
            return shape.render();
        };
        let mut expr = if shape.fields.is_empty() {
            expr
        } else {
            format!("{expr}.extend({{ {} }})", shape.fields.join(", "))
        };
        if let Some((_, value)) = shape.index {
            expr = format!("{expr}.catchall({value})");
        }
        expr
    }

    fn ty(&mut self, ty: &Type) -> String {
        match ty {
            Type::Keyword(keyword) => self.keyword(keyword.keyword().as_deref().unwrap_or("")),
            Type::Literal(literal) => self.literal(literal),
            Type::Paren(paren) => match paren.ty() {
                Some(inner) => self.ty(&inner),
                None => self.unknown(),
            },
            Type::Union(union) => {
                let members: Vec<String> = union.types().map(|t| self.ty(&t)).collect();
                match members.len() {
                    0 => self.unknown(),
                    1 => members.into_iter().next().unwrap_or_default(),
                    _ => format!("z.union([{}])", members.join(", ")),
                }
            }
            Type::Intersection(intersection) => {
                let members: Vec<String> = intersection.types().map(|t| self.ty(&t)).collect();
                members
                    .into_iter()
                    .reduce(|acc, next| format!("z.intersection({acc}, {next})"))
                    .unwrap_or_else(|| self.unknown())
            }
            Type::Array(array) => match array.element() {
                Some(element) => format!("z.array({})", self.ty(&element)),
                None => self.unknown(),
            },
            Type::Operator(op) => match (op.operator(), op.ty()) {
                (Some(SyntaxKind::READONLY_KW), Some(inner)) => self.ty(&inner),
                (Some(SyntaxKind::UNIQUE_KW), Some(Type::Keyword(k)))
                    if k.keyword().as_deref() == Some("symbol") =>
                {
                    "z.symbol()".to_string()
                }
                _ => self.unknown(),
            },
            Type::Tuple(tuple) => self.tuple(tuple),
            Type::Object(object) => self.object(object),
            Type::Ref(reference) => self.reference(reference),
            Type::Conditional(_)
            | Type::Infer(_)
            | Type::IndexedAccess(_)
            | Type::Function(_)
            | Type::Constructor(_)
            | Type::Predicate(_)
            | Type::Query(_)
            | Type::Import(_)
            | Type::Mapped(_) => self.unknown(),
        }
    }

    fn keyword(&mut self, keyword: &str) -> String {
        let expr = match keyword {
            "string" => "z.string()",
            "number" => "z.number()",
            "boolean" => "z.boolean()",
            "bigint" => "z.bigint()",
            "symbol" => "z.symbol()",
            "undefined" => "z.undefined()",
            "null" => "z.null()",
            "void" => "z.void()",
            "any" => "z.any()",
            "unknown" => "z.unknown()",
            "never" => "z.never()",
            "object" => "z.object({}).passthrough()",
            _ => return self.unknown(),
        };
        expr.to_string()
    }

    fn literal(&mut self, literal: &LiteralType) -> String {
        let text = literal.text();
        if literal.token_kind() == Some(SyntaxKind::TEMPLATE) && text.contains("${") {
            return self.unknown();
        }
        format!("z.literal({text})")
    }

    fn tuple(&mut self, tuple: &TupleType) -> String {
        let mut items = Vec::new();
        let mut rest = None;
        for element in tuple.elements() {
            let Some(ty) = element.ty() else {
                items.push(self.unknown());
                continue;
            };
            if element.is_rest() {
                rest = Some(match &ty {
                    Type::Array(array) => match array.element() {
                        Some(inner) => self.ty(&inner),
                        None => self.unknown(),
                    },
                    _ => self.unknown(),
                });
                continue;
            }
            let expr = self.ty(&ty);
            items.push(if element.is_optional() {
                format!("{expr}.optional()")
            } else {
                expr
            });
        }
        let base = format!("z.tuple([{}])", items.join(", "));
        match rest {
            Some(rest) => format!("{base}.rest({rest})"),
            None => base,
        }
    }

    fn object(&mut self, object: &ObjectType) -> String {
        self.shape(object).render()
    }

    fn shape(&mut self, object: &ObjectType) -> Shape {
        let mut shape = Shape::default();
        for member in object.members() {
            match member {
                TypeMember::Property(prop) => {
                    let Some(key) = prop.key().and_then(|k| k.text()) else {
                        self.lossy = true;
                        continue;
                    };
                    let value = match prop.ty() {
                        Some(ty) => self.ty(&ty),
                        None => "z.any()".to_string(),
                    };
                    let value = if prop.is_optional() {
                        format!("{value}.optional()")
                    } else {
                        value
                    };
                    shape.fields.push(format!("{}: {value}", object_key(&key)));
                }
                TypeMember::Index(sig) => {
                    let key = match sig.key_ty() {
                        Some(ty) => self.ty(&ty),
                        None => self.unknown(),
                    };
                    let value = match sig.value_ty() {
                        Some(ty) => self.ty(&ty),
                        None => self.unknown(),
                    };
                    shape.index = Some((key, value));
                }
                TypeMember::Method(_) | TypeMember::Call(_) | TypeMember::Construct(_) => {
                    self.lossy = true;
                }
            }
        }
        shape
    }

    fn reference(&mut self, reference: &TypeRef) -> String {
        let Some(entity) = reference.entity_name() else {
            return self.unknown();
        };
        let Some(first) = entity.first_segment() else {
            return self.unknown();
        };

        if entity.is_qualified() {
            // `Enum.Member` of an enum declared in this file
            let is_local_enum = self
                .module
                .local_declaration(&first)
                .is_some_and(|d| d.is_enum());
            if is_local_enum {
                let path: Vec<String> = entity.segments().map(|t| t.text().to_string()).collect();
                return format!("z.literal({})", path.join("."));
            }
            return self.unknown();
        }

        if self.is_known(&first) {
            return self.style.schema_name(&first);
        }

        let args: Vec<Type> = reference.args();
        let arg = |translator: &mut Self, i: usize| match args.get(i) {
            Some(ty) => translator.ty(ty),
            None => translator.unknown(),
        };
        match (first.as_str(), args.len()) {
            ("Array" | "ReadonlyArray", 1) => format!("z.array({})", arg(self, 0)),
            ("Record", 2) => format!("z.record({}, {})", arg(self, 0), arg(self, 1)),
            ("Partial", 1) => format!("{}.partial()", arg(self, 0)),
            ("Required", 1) => format!("{}.required()", arg(self, 0)),
            ("Promise", 1) => format!("z.promise({})", arg(self, 0)),
            ("Set" | "ReadonlySet", 1) => format!("z.set({})", arg(self, 0)),
            ("Map" | "ReadonlyMap", 2) => format!("z.map({}, {})", arg(self, 0), arg(self, 1)),
            ("Date", 0) => "z.date()".to_string(),
            _ => self.unknown(),
        }
    }
}
