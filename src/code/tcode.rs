//! Three-address code ("t-code"), the output of code generation.
//!
//! Instructions are immutable values whose operands are the textual
//! names used by the virtual machine: variable names, `%n` temporaries,
//! literals, and labels. Instruction lists are plain vectors, composed
//! by concatenation and owned by the subroutine they end up in.

use std::fmt::{self, Display};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instr {
    /// Scalar copy.
    Load { dst: String, src: String },
    /// Integer immediate.
    ILoad { dst: String, lit: String },
    /// Float immediate.
    FLoad { dst: String, lit: String },
    /// Character immediate.
    ChLoad { dst: String, lit: String },
    /// Array read: `dst = base[offs]`.
    LoadX { dst: String, base: String, offs: String },
    /// Array write: `base[offs] = src`.
    XLoad { base: String, offs: String, src: String },
    /// Take the address of an array variable.
    ALoad { dst: String, src: String },

    Add { dst: String, left: String, right: String },
    Sub { dst: String, left: String, right: String },
    Mul { dst: String, left: String, right: String },
    Div { dst: String, left: String, right: String },

    FAdd { dst: String, left: String, right: String },
    FSub { dst: String, left: String, right: String },
    FMul { dst: String, left: String, right: String },
    FDiv { dst: String, left: String, right: String },

    Neg { dst: String, src: String },
    FNeg { dst: String, src: String },
    /// Integer-to-float conversion.
    Float { dst: String, src: String },
    Not { dst: String, src: String },

    Eq { dst: String, left: String, right: String },
    Lt { dst: String, left: String, right: String },
    Le { dst: String, left: String, right: String },
    FEq { dst: String, left: String, right: String },
    FLt { dst: String, left: String, right: String },
    FLe { dst: String, left: String, right: String },

    And { dst: String, left: String, right: String },
    Or { dst: String, left: String, right: String },

    Label { name: String },
    UJump { label: String },
    /// Jump to `label` when `cond` is zero.
    FJump { cond: String, label: String },

    ReadI { dst: String },
    ReadF { dst: String },
    ReadC { dst: String },
    WriteI { src: String },
    WriteF { src: String },
    WriteC { src: String },
    WriteLn,

    /// Without an operand, reserves the return slot.
    Push { src: Option<String> },
    Call { name: String },
    /// Without an operand, discards the popped slot.
    Pop { dst: Option<String> },
    Return,
}

impl Instr {
    fn render(&self) -> (&'static str, Vec<&String>) {
        use Instr::*;
        match self {
            Load { dst, src } => ("LOAD", vec![dst, src]),
            ILoad { dst, lit } => ("ILOAD", vec![dst, lit]),
            FLoad { dst, lit } => ("FLOAD", vec![dst, lit]),
            ChLoad { dst, lit } => ("CHLOAD", vec![dst, lit]),
            LoadX { dst, base, offs } => ("LOADX", vec![dst, base, offs]),
            XLoad { base, offs, src } => ("XLOAD", vec![base, offs, src]),
            ALoad { dst, src } => ("ALOAD", vec![dst, src]),
            Add { dst, left, right } => ("ADD", vec![dst, left, right]),
            Sub { dst, left, right } => ("SUB", vec![dst, left, right]),
            Mul { dst, left, right } => ("MUL", vec![dst, left, right]),
            Div { dst, left, right } => ("DIV", vec![dst, left, right]),
            FAdd { dst, left, right } => ("FADD", vec![dst, left, right]),
            FSub { dst, left, right } => ("FSUB", vec![dst, left, right]),
            FMul { dst, left, right } => ("FMUL", vec![dst, left, right]),
            FDiv { dst, left, right } => ("FDIV", vec![dst, left, right]),
            Neg { dst, src } => ("NEG", vec![dst, src]),
            FNeg { dst, src } => ("FNEG", vec![dst, src]),
            Float { dst, src } => ("FLOAT", vec![dst, src]),
            Not { dst, src } => ("NOT", vec![dst, src]),
            Eq { dst, left, right } => ("EQ", vec![dst, left, right]),
            Lt { dst, left, right } => ("LT", vec![dst, left, right]),
            Le { dst, left, right } => ("LE", vec![dst, left, right]),
            FEq { dst, left, right } => ("FEQ", vec![dst, left, right]),
            FLt { dst, left, right } => ("FLT", vec![dst, left, right]),
            FLe { dst, left, right } => ("FLE", vec![dst, left, right]),
            And { dst, left, right } => ("AND", vec![dst, left, right]),
            Or { dst, left, right } => ("OR", vec![dst, left, right]),
            Label { name } => ("LABEL", vec![name]),
            UJump { label } => ("UJUMP", vec![label]),
            FJump { cond, label } => ("FJUMP", vec![cond, label]),
            ReadI { dst } => ("READI", vec![dst]),
            ReadF { dst } => ("READF", vec![dst]),
            ReadC { dst } => ("READC", vec![dst]),
            WriteI { src } => ("WRITEI", vec![src]),
            WriteF { src } => ("WRITEF", vec![src]),
            WriteC { src } => ("WRITEC", vec![src]),
            WriteLn => ("WRITELN", vec![]),
            Push { src } => ("PUSH", src.iter().collect()),
            Call { name } => ("CALL", vec![name]),
            Pop { dst } => ("POP", dst.iter().collect()),
            Return => ("RETURN", vec![]),
        }
    }
}

impl Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (opcode, operands) = self.render();
        if operands.is_empty() {
            f.write_str(opcode)
        } else {
            let operands: Vec<&str> = operands.iter().map(|s| s.as_str()).collect();
            write!(f, "{} {}", opcode, operands.join(","))
        }
    }
}

/// Mints unique temporaries and label suffixes within one subroutine;
/// reset on function entry.
#[derive(Debug, Default)]
pub struct Counters {
    temps: u32,
    ifs: u32,
    whiles: u32,
}

impl Counters {
    pub fn reset(&mut self) {
        *self = Counters::default();
    }

    pub fn new_temp(&mut self) -> String {
        let n = self.temps;
        self.temps += 1;
        format!("%{}", n)
    }

    pub fn new_label_if(&mut self) -> String {
        let n = self.ifs;
        self.ifs += 1;
        n.to_string()
    }

    pub fn new_label_while(&mut self) -> String {
        let n = self.whiles;
        self.whiles += 1;
        n.to_string()
    }
}

/// A local variable with its storage size in cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVar {
    pub name: String,
    pub size: usize,
}

/// The compiled form of one function.
#[derive(Debug)]
pub struct Subroutine {
    pub name: String,
    pub params: Vec<String>,
    pub vars: Vec<LocalVar>,
    pub instrs: Vec<Instr>,
}

impl Display for Subroutine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "subroutine {}", self.name)?;
        write!(f, "  params:")?;
        for param in &self.params {
            write!(f, " {}", param)?;
        }
        writeln!(f)?;
        write!(f, "  vars:")?;
        for var in &self.vars {
            write!(f, " {}:{}", var.name, var.size)?;
        }
        writeln!(f)?;
        writeln!(f, "  instructions:")?;
        for instr in &self.instrs {
            writeln!(f, "    {}", instr)?;
        }
        writeln!(f, "endsubroutine")
    }
}

/// An entire compiled program, one subroutine per function.
#[derive(Debug, Default)]
pub struct TProgram {
    pub subs: Vec<Subroutine>,
}

impl Display for TProgram {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, sub) in self.subs.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", sub)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instructions_render_with_comma_separated_operands() {
        let instr = Instr::Add {
            dst: "%2".into(),
            left: "%0".into(),
            right: "%1".into(),
        };
        assert_eq!(instr.to_string(), "ADD %2,%0,%1");

        assert_eq!(Instr::WriteLn.to_string(), "WRITELN");
        assert_eq!(Instr::Push { src: None }.to_string(), "PUSH");
        assert_eq!(
            Instr::Push {
                src: Some("%3".into())
            }
            .to_string(),
            "PUSH %3"
        );
        assert_eq!(
            Instr::FJump {
                cond: "%0".into(),
                label: "endif0".into()
            }
            .to_string(),
            "FJUMP %0,endif0"
        );
    }

    #[test]
    fn counters_mint_unique_names_and_reset() {
        let mut counters = Counters::default();
        assert_eq!(counters.new_temp(), "%0");
        assert_eq!(counters.new_temp(), "%1");
        assert_eq!(counters.new_label_if(), "0");
        assert_eq!(counters.new_label_while(), "0");
        assert_eq!(counters.new_label_if(), "1");

        counters.reset();
        assert_eq!(counters.new_temp(), "%0");
    }
}
