//! Call-site option types, including the header default-merge formula.
//!
//! The client class is generic over `HT`, the type of the default headers it
//! was constructed with. For an endpoint header type `EP` the formula is
//!
//! ```text
//! Covered   = Extract<keyof HT, keyof EP>
//! Uncovered = Exclude<keyof EP, Covered>
//! [Uncovered] extends [never]
//!   ? { header?: EP }
//!   : { header: (Pick<EP, Uncovered> & Partial<Record<Covered, never>>) | EP }
//! ```
//!
//! It is emitted as a type and only resolved by the TypeScript compiler at the
//! call site. [`HeaderMerge::requirement`] evaluates it for a concrete key set.

use std::collections::BTreeSet;

use super::api::{ParamGroup, RequestBody};
use super::types::{TsProp, TsType};
use super::utils::group_if_compound;

/// Generic parameter of the client class carrying the default header type.
pub const HEADER_TYPE_PARAM: &str = "HT";

const CONTENT_TYPE: &str = "content-type";

/// Header-merge formula for one endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderMerge {
    /// Declared header type, parenthesized when compound.
    pub declared: String,
    /// `EpHeader`: the declared type without `Content-Type`.
    pub ep_header: TsType,
    /// Caller-supplied header names, `Content-Type` excluded.
    pub keys: Vec<String>,
}

/// Outcome of evaluating the formula against concrete default header names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderRequirement {
    /// Every header is defaulted; the argument may be omitted.
    Optional,
    /// The caller must pass at least the uncovered headers.
    Required {
        uncovered: Vec<String>,
        covered: Vec<String>,
    },
}

impl HeaderMerge {
    /// `None` when the group only declares `Content-Type`.
    pub fn new(group: &ParamGroup) -> Option<Self> {
        let (content_type, keys): (Vec<String>, Vec<String>) = group
            .keys
            .iter()
            .cloned()
            .partition(|key| key.eq_ignore_ascii_case(CONTENT_TYPE));
        if keys.is_empty() && !content_type.is_empty() {
            return None;
        }

        let declared = group_if_compound(&group.ty);
        let ep_header = if content_type.is_empty() {
            TsType::Ref(declared.clone())
        } else {
            TsType::Omit {
                ty: Box::new(TsType::Ref(declared.clone())),
                keys: Box::new(TsType::literal_union(content_type)),
            }
        };
        Some(Self {
            declared,
            ep_header,
            keys,
        })
    }

    /// `Extract<keyof HT, keyof EpHeader>`
    pub fn covered(&self) -> TsType {
        TsType::Extract(
            Box::new(TsType::KeyOf(Box::new(TsType::Ref(HEADER_TYPE_PARAM.to_string())))),
            Box::new(TsType::KeyOf(Box::new(self.ep_header.clone()))),
        )
    }

    /// `Exclude<keyof EpHeader, Covered>`
    pub fn uncovered(&self) -> TsType {
        TsType::Exclude(
            Box::new(TsType::KeyOf(Box::new(self.ep_header.clone()))),
            Box::new(self.covered()),
        )
    }

    /// The conditional type selecting the optional or required header shape.
    pub fn formula(&self) -> TsType {
        let header = |ty: TsType, optional: bool| {
            TsType::Object(vec![TsProp {
                name: "header".to_string(),
                ty,
                optional,
            }])
        };
        let partial_only = TsType::Intersection(vec![
            TsType::Pick {
                ty: Box::new(self.ep_header.clone()),
                keys: Box::new(self.uncovered()),
            },
            TsType::Partial(Box::new(TsType::Record {
                key: Box::new(self.covered()),
                value: Box::new(TsType::never()),
            })),
        ]);

        TsType::Conditional {
            check: Box::new(TsType::Tuple(vec![self.uncovered()])),
            extends: Box::new(TsType::Tuple(vec![TsType::never()])),
            then: Box::new(header(self.ep_header.clone(), true)),
            otherwise: Box::new(header(
                TsType::Union(vec![partial_only, self.ep_header.clone()]),
                false,
            )),
        }
    }

    /// Evaluate the formula for clients whose defaults carry `default_keys`.
    pub fn requirement(&self, default_keys: &BTreeSet<String>) -> HeaderRequirement {
        let (covered, uncovered): (Vec<String>, Vec<String>) = self
            .keys
            .iter()
            .cloned()
            .partition(|key| default_keys.contains(key));
        if uncovered.is_empty() {
            HeaderRequirement::Optional
        } else {
            HeaderRequirement::Required { uncovered, covered }
        }
    }
}

/// The single parameter type of a generated method.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionsType {
    pub header: Option<HeaderMerge>,
    /// `query`, `path` and `body` fields, in that order.
    pub fields: Vec<TsProp>,
}

impl OptionsType {
    pub fn to_ts_type(&self) -> TsType {
        let fields = TsType::Object(self.fields.clone());
        match &self.header {
            Some(header) if self.fields.is_empty() => header.formula(),
            Some(header) => TsType::Intersection(vec![header.formula(), fields]),
            None => fields,
        }
    }

    /// Whether callers may omit the argument altogether.
    pub fn is_optional(&self) -> bool {
        self.header.is_none() && self.fields.iter().all(|field| field.optional)
    }

    pub fn field(&self, name: &str) -> Option<&TsProp> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Build the option type from an endpoint's parameter groups and body.
/// `None` means the method takes no argument.
pub fn synthesize_options(
    header: Option<&ParamGroup>,
    query: Option<&ParamGroup>,
    path: Option<&ParamGroup>,
    body: Option<&RequestBody>,
) -> Option<OptionsType> {
    let header = header.and_then(HeaderMerge::new);

    let mut fields: Vec<TsProp> = [("query", query), ("path", path)]
        .into_iter()
        .filter_map(|(name, group)| {
            group.map(|group| TsProp {
                name: name.to_string(),
                ty: TsType::Ref(group.ty.clone()),
                optional: group.optional,
            })
        })
        .collect();
    if let Some(body) = body {
        fields.push(TsProp {
            name: "body".to_string(),
            ty: TsType::Ref(body.ty.clone()),
            optional: body.optional,
        });
    }

    if header.is_none() && fields.is_empty() {
        return None;
    }
    Some(OptionsType { header, fields })
}
