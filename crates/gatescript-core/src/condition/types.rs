//! Condition tree types

use crate::error::{Result, ScriptError};
use serde::Serialize;
use std::fmt;

/// Comparison operator of a leaf condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    /// Equal (==)
    Eq,
    /// Not equal (!=)
    Ne,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Ge,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Le,
}

impl Operator {
    /// Source text of the operator
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Lt => "<",
            Operator::Le => "<=",
        }
    }

    /// Look up an operator by its source text
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "==" => Some(Operator::Eq),
            "!=" => Some(Operator::Ne),
            ">" => Some(Operator::Gt),
            ">=" => Some(Operator::Ge),
            "<" => Some(Operator::Lt),
            "<=" => Some(Operator::Le),
            _ => None,
        }
    }

    /// Returns true for the four operators that force integer comparison
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            Operator::Gt | Operator::Ge | Operator::Lt | Operator::Le
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// How `==` and `!=` compare their operands
///
/// The parser always produces `String`; `Number` is only reachable by
/// building a [`Condition`] directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CompareType {
    #[default]
    String,
    Number,
}

/// A leaf comparison: `'first' OP 'second'`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Condition {
    first_operand: String,
    operator: Operator,
    second_operand: String,
    compare_type: CompareType,
}

impl Condition {
    /// Create a string-compared condition
    pub fn new(
        first_operand: impl Into<String>,
        operator: Operator,
        second_operand: impl Into<String>,
    ) -> Self {
        Self {
            first_operand: first_operand.into(),
            operator,
            second_operand: second_operand.into(),
            compare_type: CompareType::default(),
        }
    }

    /// Set how equality operators compare
    pub fn with_compare_type(mut self, compare_type: CompareType) -> Self {
        self.compare_type = compare_type;
        self
    }

    pub fn first_operand(&self) -> &str {
        &self.first_operand
    }

    pub fn second_operand(&self) -> &str {
        &self.second_operand
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn compare_type(&self) -> CompareType {
        self.compare_type
    }

    /// Reduce the comparison to a boolean
    ///
    /// Ordering operators always compare integers. Equality operators compare
    /// text unless the compare type is `Number`. Operands that do not parse as
    /// integers make a numeric comparison `false` regardless of the operator.
    pub fn is_true(&self) -> bool {
        match self.operator {
            Operator::Eq | Operator::Ne => {
                let equal = match self.compare_type {
                    CompareType::String => self.first_operand == self.second_operand,
                    CompareType::Number => match self.integer_operands() {
                        Some((first, second)) => first == second,
                        None => return false,
                    },
                };
                if self.operator == Operator::Eq {
                    equal
                } else {
                    !equal
                }
            }
            Operator::Gt | Operator::Ge | Operator::Lt | Operator::Le => {
                let Some((first, second)) = self.integer_operands() else {
                    return false;
                };
                match self.operator {
                    Operator::Gt => first > second,
                    Operator::Ge => first >= second,
                    Operator::Lt => first < second,
                    _ => first <= second,
                }
            }
        }
    }

    fn integer_operands(&self) -> Option<(i64, i64)> {
        let first = parse_integer(&self.first_operand)?;
        let second = parse_integer(&self.second_operand)?;
        Some((first, second))
    }
}

fn parse_integer(operand: &str) -> Option<i64> {
    operand.trim().parse::<i64>().ok()
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "('{}' {} '{}')",
            self.first_operand, self.operator, self.second_operand
        )
    }
}

/// Boolean connective between sibling groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Connective {
    And,
    Or,
}

impl Connective {
    /// Keyword as written in condition text
    pub fn keyword(&self) -> &'static str {
        match self {
            Connective::And => "And",
            Connective::Or => "Or",
        }
    }

    /// Combine two verdicts
    pub fn apply(&self, left: bool, right: bool) -> bool {
        match self {
            Connective::And => left && right,
            Connective::Or => left || right,
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// How two sibling groups combine, by index into the parent's sub-groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GroupLink {
    pub left: usize,
    pub connective: Connective,
    pub right: usize,
}

/// Node of a parsed condition tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Group {
    /// Group holding a single comparison
    Leaf(Condition),
    /// Group holding linked sub-groups
    Compound(CompoundGroup),
}

/// Sub-groups joined pairwise in encounter order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompoundGroup {
    sub_groups: Vec<Group>,
    links: Vec<GroupLink>,
}

impl CompoundGroup {
    /// Create a compound group, validating that link `i` joins sub-group `i`
    /// to sub-group `i + 1` and that every adjacent pair is linked
    pub fn new(sub_groups: Vec<Group>, links: Vec<GroupLink>) -> Result<Self> {
        if sub_groups.is_empty() {
            return Err(ScriptError::InvalidGroup(
                "a group needs to have exactly one condition or multiple sub-conditions"
                    .to_string(),
            ));
        }
        if links.len() != sub_groups.len() - 1 {
            return Err(ScriptError::InvalidGroup(format!(
                "{} sub-groups need {} links, got {}",
                sub_groups.len(),
                sub_groups.len() - 1,
                links.len()
            )));
        }
        for (index, link) in links.iter().enumerate() {
            if link.left != index || link.right != index + 1 {
                return Err(ScriptError::InvalidGroup(format!(
                    "link {} joins groups {} and {}, expected {} and {}",
                    index,
                    link.left,
                    link.right,
                    index,
                    index + 1
                )));
            }
        }
        Ok(Self { sub_groups, links })
    }

    pub fn sub_groups(&self) -> &[Group] {
        &self.sub_groups
    }

    pub fn links(&self) -> &[GroupLink] {
        &self.links
    }

    fn evaluate(&self) -> bool {
        let mut verdict = self.sub_groups[0].evaluate();
        for link in &self.links {
            verdict = match (link.connective, verdict) {
                (Connective::And, false) => false,
                (Connective::Or, true) => true,
                (connective, left) => {
                    connective.apply(left, self.sub_groups[link.right].evaluate())
                }
            };
        }
        verdict
    }
}

impl Group {
    /// Create a leaf group
    pub fn leaf(condition: Condition) -> Self {
        Group::Leaf(condition)
    }

    /// Create a compound group linking `first` and each following group in order
    pub fn chain(first: Group, rest: Vec<(Connective, Group)>) -> Self {
        let mut sub_groups = Vec::with_capacity(rest.len() + 1);
        let mut links = Vec::with_capacity(rest.len());
        sub_groups.push(first);
        for (connective, group) in rest {
            links.push(GroupLink {
                left: sub_groups.len() - 1,
                connective,
                right: sub_groups.len(),
            });
            sub_groups.push(group);
        }
        Group::Compound(CompoundGroup { sub_groups, links })
    }

    /// The leaf comparison, if this group holds one
    pub fn condition(&self) -> Option<&Condition> {
        match self {
            Group::Leaf(condition) => Some(condition),
            Group::Compound(_) => None,
        }
    }

    /// Child groups (empty for a leaf)
    pub fn sub_groups(&self) -> &[Group] {
        match self {
            Group::Leaf(_) => &[],
            Group::Compound(compound) => compound.sub_groups(),
        }
    }

    /// Links between child groups (empty for a leaf)
    pub fn links(&self) -> &[GroupLink] {
        match self {
            Group::Leaf(_) => &[],
            Group::Compound(compound) => compound.links(),
        }
    }

    /// Reduce the tree to a verdict, linking sub-groups strictly left to right
    pub fn evaluate(&self) -> bool {
        match self {
            Group::Leaf(condition) => condition.is_true(),
            Group::Compound(compound) => compound.evaluate(),
        }
    }

    /// Number of nested group levels, counting this one
    pub fn depth(&self) -> usize {
        1 + self
            .sub_groups()
            .iter()
            .map(Group::depth)
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Group::Leaf(condition) => write!(f, "{}", condition),
            Group::Compound(compound) => {
                f.write_str("(")?;
                for (index, group) in compound.sub_groups.iter().enumerate() {
                    if index > 0 {
                        write!(f, " {} ", compound.links[index - 1].connective)?;
                    }
                    write!(f, "{}", group)?;
                }
                f.write_str(")")
            }
        }
    }
}
