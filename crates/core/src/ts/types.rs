//! TypeScript type expression AST.
//!
//! Synthesis builds these values; rendering to text happens only in
//! [`Emit`](super::Emit).

/// TypeScript type representation
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    /// Primitive types: string, number, boolean, null, void, unknown, object, Blob
    Primitive(TsPrimitive),
    /// Array type: T[]
    Array(Box<TsType>),
    /// Union type: A | B | C
    Union(Vec<TsType>),
    /// Intersection type: A & B & C
    Intersection(Vec<TsType>),
    /// Object type: { foo: string; bar?: number }
    Object(Vec<TsProp>),
    /// Record type: Record<K, V>
    #[allow(missing_docs)]
    Record {
        key: Box<TsType>,
        value: Box<TsType>,
    },
    /// Literal type: "foo", 42, true
    Literal(TsLiteral),
    /// Named type reference
    Ref(String),
}

/// TypeScript primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum TsPrimitive {
    String,
    Number,
    Boolean,
    Null,
    Void,
    Unknown,
    /// The generic `object` type, used past the nesting ceiling.
    Object,
    /// Binary payloads (`format: binary`).
    Blob,
}

/// Object property definition
#[derive(Debug, Clone, PartialEq)]
pub struct TsProp {
    /// Property key, quoted on output when it is not an identifier.
    pub name: String,
    /// Property type.
    pub ty: TsType,
    /// Renders as `name?:`.
    pub optional: bool,
    /// Renders as `T | null`.
    pub nullable: bool,
}

/// TypeScript literal values
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum TsLiteral {
    String(String),
    Number(f64),
    Int(i64),
    Bool(bool),
    Null,
}

/// Type definition kind
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefKind {
    /// interface Foo { ... }
    Interface {
        /// Members, in order.
        properties: Vec<TsProp>,
    },
    /// type Foo = ...
    TypeAlias {
        /// Right-hand side.
        ty: TsType,
    },
}

/// Type definition
#[derive(Debug, Clone, PartialEq)]
pub struct TsTypeDef {
    /// Declared name. Folded into an identifier on output.
    pub name: String,
    /// Interface or alias body.
    pub kind: TypeDefKind,
}

/// A generated source file: leading comment lines followed by declarations.
#[derive(Debug, Clone, Default)]
pub struct TsModule {
    /// Lines rendered as `// ...` comments.
    pub banner: Vec<String>,
    /// Declarations, in output order.
    pub types: Vec<TsTypeDef>,
}

impl TsType {
    /// `unknown`
    pub fn unknown() -> Self {
        TsType::Primitive(TsPrimitive::Unknown)
    }

    /// `Record<string, T>`
    pub fn string_record(value: TsType) -> Self {
        TsType::Record {
            key: Box::new(TsType::Primitive(TsPrimitive::String)),
            value: Box::new(value),
        }
    }

    /// `Record<string, unknown>`
    pub fn unknown_record() -> Self {
        Self::string_record(Self::unknown())
    }

    /// Union of `types`, collapsing the one-member case and mapping the
    /// empty case to `unknown`.
    pub fn union(mut types: Vec<TsType>) -> Self {
        match types.len() {
            0 => Self::unknown(),
            1 => types.pop().unwrap_or_else(Self::unknown),
            _ => TsType::Union(types),
        }
    }

    /// Intersection of `types`, with the same collapsing rules as [`TsType::union`].
    pub fn intersection(mut types: Vec<TsType>) -> Self {
        match types.len() {
            0 => Self::unknown(),
            1 => types.pop().unwrap_or_else(Self::unknown),
            _ => TsType::Intersection(types),
        }
    }

    /// Whether the type already admits `null` at its top level.
    pub fn is_nullable(&self) -> bool {
        match self {
            TsType::Primitive(TsPrimitive::Null) | TsType::Literal(TsLiteral::Null) => true,
            TsType::Union(types) => types.iter().any(TsType::is_nullable),
            _ => false,
        }
    }
}

impl TsTypeDef {
    /// `type {name} = {ty};`
    pub fn alias(name: impl Into<String>, ty: TsType) -> Self {
        Self {
            name: name.into(),
            kind: TypeDefKind::TypeAlias { ty },
        }
    }

    /// `interface {name} { ... }`
    pub fn interface(name: impl Into<String>, properties: Vec<TsProp>) -> Self {
        Self {
            name: name.into(),
            kind: TypeDefKind::Interface { properties },
        }
    }
}
