use std::fmt;

use crate::arch::*;

use super::OperandClass;

/// The standard integer kinds, in increasing conversion rank.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StandardInteger {
    Bool,
    Char,
    Short,
    Int,
    Long,
    LongLong,
}

impl StandardInteger {
    pub fn width(self) -> u32 {
        use StandardInteger::*;
        match self {
            Bool => BOOL_WIDTH,
            Char => CHAR_WIDTH,
            Short => SHORT_WIDTH,
            Int => INT_WIDTH,
            Long => LONG_WIDTH,
            LongLong => LONG_LONG_WIDTH,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Signedness {
    Signed,
    Unsigned,
    /// No `signed` or `unsigned` was written. Only plain `char` and
    /// `_Bool` use this.
    Unspecified,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntegerKind {
    Standard(StandardInteger),
    /// `_BitInt(N)`
    BitPrecise(u32),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct IntegerType {
    pub kind: IntegerKind,
    pub signedness: Signedness,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FloatingType {
    Float,
    Double,
    LongDouble,
}

/// The type of an arithmetic value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    Integer(IntegerType),
    Floating(FloatingType),
}

impl IntegerType {
    pub const INT: IntegerType = IntegerType::standard(StandardInteger::Int, Signedness::Signed);
    pub const UNSIGNED_INT: IntegerType =
        IntegerType::standard(StandardInteger::Int, Signedness::Unsigned);

    pub const fn standard(kind: StandardInteger, signedness: Signedness) -> Self {
        Self {
            kind: IntegerKind::Standard(kind),
            signedness,
        }
    }

    pub const fn bit_precise(width: u32, signedness: Signedness) -> Self {
        Self {
            kind: IntegerKind::BitPrecise(width),
            signedness,
        }
    }

    /// Plain `char` counts as signed; `_Bool` never does.
    pub fn is_signed(self) -> bool {
        match self.kind {
            IntegerKind::Standard(StandardInteger::Bool) => false,
            _ => self.signedness != Signedness::Unsigned,
        }
    }

    pub fn width(self) -> u32 {
        match self.kind {
            IntegerKind::Standard(kind) => kind.width(),
            IntegerKind::BitPrecise(width) => width,
        }
    }

    /// Bits available for the magnitude, i.e. the width minus the sign bit.
    pub fn value_bits(self) -> u32 {
        if self.is_signed() {
            self.width() - 1
        } else {
            self.width()
        }
    }

    /// Integer conversion rank. `_BitInt(N)` ranks above every standard
    /// type, ordered by width.
    pub fn rank(self) -> u64 {
        match self.kind {
            IntegerKind::Standard(kind) => kind as u64,
            IntegerKind::BitPrecise(width) => StandardInteger::LongLong as u64 + u64::from(width),
        }
    }

    pub fn to_unsigned(self) -> Self {
        Self {
            signedness: Signedness::Unsigned,
            ..self
        }
    }

    /// Whether `value` is representable in this type.
    pub fn can_represent(self, value: u128) -> bool {
        let bits = self.value_bits();
        bits >= 128 || value >> bits == 0
    }

    /// 6.3.1.1 Integer promotions
    pub fn promote(self) -> Self {
        match self.kind {
            IntegerKind::Standard(kind) if kind < StandardInteger::Int => {
                if self.value_bits() <= Self::INT.value_bits() {
                    Self::INT
                } else {
                    Self::UNSIGNED_INT
                }
            }
            _ => self,
        }
    }

    fn usual_arithmetic_conversions(self, other: Self) -> Self {
        let (left, right) = (self.promote(), other.promote());
        if left == right {
            return left;
        }
        if left.is_signed() == right.is_signed() {
            return if left.rank() >= right.rank() {
                left
            } else {
                right
            };
        }

        let (unsigned, signed) = if left.is_signed() {
            (right, left)
        } else {
            (left, right)
        };
        if unsigned.rank() >= signed.rank() {
            unsigned
        } else if signed.value_bits() >= unsigned.width() {
            signed
        } else {
            signed.to_unsigned()
        }
    }
}

impl ValueType {
    pub const INT: ValueType = ValueType::Integer(IntegerType::INT);

    pub fn is_integer(self) -> bool {
        matches!(self, ValueType::Integer(_))
    }

    pub fn is_floating(self) -> bool {
        matches!(self, ValueType::Floating(_))
    }

    // every value type is arithmetic, and so real and scalar as well
    pub fn is_arithmetic(self) -> bool {
        true
    }

    pub fn satisfies(self, class: OperandClass) -> bool {
        match class {
            OperandClass::Integer => self.is_integer(),
            OperandClass::Arithmetic | OperandClass::Real | OperandClass::Scalar => {
                self.is_arithmetic()
            }
        }
    }

    pub fn promote(self) -> Self {
        match self {
            ValueType::Integer(int) => ValueType::Integer(int.promote()),
            floating => floating,
        }
    }

    /// 6.3.1.8 Usual arithmetic conversions
    ///
    /// The result does not depend on the order of the operands,
    /// and `t.usual_arithmetic_conversions(t) == t.promote()`.
    pub fn usual_arithmetic_conversions(self, other: Self) -> Self {
        use ValueType::*;
        match (self, other) {
            (Integer(left), Integer(right)) => Integer(left.usual_arithmetic_conversions(right)),
            (Floating(left), Floating(right)) => Floating(left.max(right)),
            (Floating(float), Integer(_)) | (Integer(_), Floating(float)) => Floating(float),
        }
    }
}

impl From<IntegerType> for ValueType {
    fn from(int: IntegerType) -> Self {
        ValueType::Integer(int)
    }
}

impl From<FloatingType> for ValueType {
    fn from(float: FloatingType) -> Self {
        ValueType::Floating(float)
    }
}

impl fmt::Display for IntegerType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use StandardInteger::*;

        match (self.kind, self.signedness) {
            (IntegerKind::Standard(Bool), _) => return write!(f, "_Bool"),
            (IntegerKind::Standard(Char), Signedness::Signed) => write!(f, "signed ")?,
            (_, Signedness::Unsigned) => write!(f, "unsigned ")?,
            _ => {}
        }
        match self.kind {
            IntegerKind::Standard(kind) => {
                let name = match kind {
                    Bool => "_Bool",
                    Char => "char",
                    Short => "short",
                    Int => "int",
                    Long => "long",
                    LongLong => "long long",
                };
                write!(f, "{}", name)
            }
            IntegerKind::BitPrecise(width) => write!(f, "_BitInt({})", width),
        }
    }
}

impl fmt::Display for FloatingType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            FloatingType::Float => "float",
            FloatingType::Double => "double",
            FloatingType::LongDouble => "long double",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValueType::Integer(int) => write!(f, "{}", int),
            ValueType::Floating(float) => write!(f, "{}", float),
        }
    }
}
