//! Target-language layout.
//!
//! The constructors in [`crate::base`] and [`crate::implementation`] decide
//! what goes into each placeholder and describe it with the plain data types
//! below. A [`Syntax`] turns that data into text. [`Php`] is the shipped
//! layout.

use flowsmith_core::grammar;
use flowsmith_core::{FieldBinding, FieldDecl};

/// An abstract operation, one per state.
#[derive(Debug, Clone)]
pub struct OperationSig<'a> {
    pub name: String,
    pub params: &'a [FieldDecl],
    pub result: &'a FieldDecl,
}

/// What happens after a state's operation returns.
#[derive(Debug, Clone)]
pub enum Branches<'a> {
    /// Single transition to another state.
    Goto(String),
    /// Single transition to the terminal marker.
    Terminate,
    /// Guards tried in order, then a failure.
    Guarded(Vec<GuardedBranch<'a>>),
}

#[derive(Debug, Clone)]
pub struct GuardedBranch<'a> {
    pub guard: &'a str,
    /// Dispatch function to call, or `None` to return.
    pub dispatch: Option<String>,
}

/// A concrete dispatch function, one per state.
#[derive(Debug, Clone)]
pub struct DispatchFn<'a> {
    pub state: &'a str,
    pub name: String,
    pub operation: &'a OperationSig<'a>,
    pub branches: Branches<'a>,
}

/// Import statements for every name, in sorted order.
pub fn import_block<'n>(
    syntax: &dyn Syntax,
    qualified_names: impl IntoIterator<Item = &'n str>,
) -> String {
    let mut lines: Vec<String> = qualified_names
        .into_iter()
        .map(|n| syntax.import(n))
        .collect();
    lines.sort();
    lines.concat()
}

/// Text layout for one target language.
pub trait Syntax {
    /// Join namespace segments.
    fn qualify(&self, segments: &[&str]) -> String;

    fn import(&self, qualified_name: &str) -> String;

    fn field_constant_name(&self, field: &str) -> String;

    fn field_constant(&self, field: &FieldBinding) -> String;

    fn field_member(&self, field: &FieldBinding) -> String;

    /// Literal list of the accepted input keys.
    fn input_key_list(&self, input: &[FieldDecl]) -> String;

    /// Copy one input from the data container when its key is present.
    fn input_assignment(&self, field: &FieldDecl) -> String;

    /// Call the entry dispatch function, rethrowing any failure unchanged.
    fn start_dispatch(&self, dispatch: &str) -> String;

    fn abstract_operation(&self, op: &OperationSig<'_>) -> String;

    fn dispatch_function(&self, f: &DispatchFn<'_>) -> String;

    fn output_name(&self, output: &FieldDecl) -> String;

    fn entry_doc_block(&self, input: &[FieldDecl], output: &FieldDecl) -> String;

    fn entry_parameters(&self, input: &[FieldDecl]) -> String;

    /// Declared return type of the entry point; empty when it cannot be
    /// declared (nullable output).
    fn entry_return_type(&self, output: &FieldDecl) -> String;

    fn input_data(&self, input: &[FieldDecl]) -> String;
}

/// PHP layout: `\` namespaces, `use` imports, `|null` unions, `array` for
/// collections.
#[derive(Debug, Clone, Copy, Default)]
pub struct Php;

const INDENT: &str = "    ";

impl Php {
    /// Type as written in a signature: `|null` dropped, `T[]` as `array`.
    fn signature_type(field: &FieldDecl) -> &str {
        field.base_type()
    }

    fn parameter(field: &FieldDecl) -> String {
        if field.is_nullable() {
            format!("{} ${} = null", Self::signature_type(field), field.name)
        } else {
            format!("{} ${}", Self::signature_type(field), field.name)
        }
    }

    /// One parameter per line at `depth`, closing paren back at `depth - 1`.
    fn parameter_list(params: &[FieldDecl], depth: usize) -> String {
        if params.is_empty() {
            return String::new();
        }
        let inner = INDENT.repeat(depth);
        let lines: Vec<String> = params
            .iter()
            .map(|p| format!("{}{}", inner, Self::parameter(p)))
            .collect();
        format!("\n{}\n{}", lines.join(",\n"), INDENT.repeat(depth - 1))
    }

    fn return_type(field: &FieldDecl) -> String {
        if field.is_nullable() {
            String::new()
        } else {
            format!(": {}", Self::signature_type(field))
        }
    }

    fn rethrow_block(body: &str) -> String {
        format!(
            "try {{\n{body}\n        }} catch (Exception $exception) {{\n            throw $exception;\n        }}",
            body = body
        )
    }
}

impl Syntax for Php {
    fn qualify(&self, segments: &[&str]) -> String {
        segments
            .iter()
            .map(|s| s.trim_matches('\\'))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\\")
    }

    fn import(&self, qualified_name: &str) -> String {
        format!("use {};\n", qualified_name.trim_start_matches('\\'))
    }

    fn field_constant_name(&self, field: &str) -> String {
        format!("FIELD_{}", grammar::to_upper_snake(field))
    }

    fn field_constant(&self, field: &FieldBinding) -> String {
        format!(
            "{}const {} = '{}';\n",
            INDENT,
            self.field_constant_name(&field.name),
            field.name
        )
    }

    fn field_member(&self, field: &FieldBinding) -> String {
        format!(
            "{i}/**\n{i} * @var {ty}\n{i} */\n{i}private ${name};\n\n",
            i = INDENT,
            ty = field.ty,
            name = field.name
        )
    }

    fn input_key_list(&self, input: &[FieldDecl]) -> String {
        let mut out = String::from("[\n");
        for field in input {
            out.push_str(&format!("{}'{}',\n", INDENT.repeat(4), field.name));
        }
        out.push_str(&INDENT.repeat(3));
        out.push(']');
        out
    }

    fn input_assignment(&self, field: &FieldDecl) -> String {
        format!(
            "\n        if (array_key_exists('{n}', $data)) {{\n            $this->{n} = $data['{n}'];\n        }}\n",
            n = field.name
        )
    }

    fn start_dispatch(&self, dispatch: &str) -> String {
        Self::rethrow_block(&format!("            $this->{}();", dispatch))
    }

    fn abstract_operation(&self, op: &OperationSig<'_>) -> String {
        let mut out = String::from("\n    /**");
        for param in op.params {
            out.push_str(&format!("\n     * @param {} ${}", param.ty, param.name));
        }
        if !op.params.is_empty() {
            out.push_str("\n     *");
        }
        out.push_str(&format!("\n     * @return {}\n     */", op.result.ty));
        out.push_str(&format!(
            "\n    abstract protected function {}({}){};\n",
            op.name,
            Self::parameter_list(op.params, 2),
            Self::return_type(op.result)
        ));
        out
    }

    fn dispatch_function(&self, f: &DispatchFn<'_>) -> String {
        let op = f.operation;
        let args = if op.params.is_empty() {
            String::new()
        } else {
            let lines: Vec<String> = op
                .params
                .iter()
                .map(|p| format!("                $this->{}", p.name))
                .collect();
            format!("\n{}\n            ", lines.join(",\n"))
        };
        let call = format!(
            "            $this->{} = $this->{}({});",
            op.result.name, op.name, args
        );

        let mut out = format!(
            "\n    /**\n     * @throws Exception\n     */\n    private function {}()\n    {{\n        {}\n",
            f.name,
            Self::rethrow_block(&call)
        );

        match &f.branches {
            Branches::Goto(dispatch) => {
                out.push_str(&format!("\n        $this->{}();\n", dispatch));
            }
            Branches::Terminate => {}
            Branches::Guarded(branches) => {
                out.push('\n');
                for (i, branch) in branches.iter().enumerate() {
                    let keyword = if i == 0 { "        if" } else { " elseif" };
                    let body = match &branch.dispatch {
                        Some(dispatch) => format!("$this->{}();", dispatch),
                        None => "return;".to_owned(),
                    };
                    out.push_str(&format!(
                        "{} ({}) {{\n            {}\n        }}",
                        keyword, branch.guard, body
                    ));
                }
                out.push_str(&format!(
                    " else {{\n            throw new Exception('No transition condition matched in state \"{}\".');\n        }}\n",
                    f.state
                ));
            }
        }

        out.push_str("    }\n");
        out
    }

    fn output_name(&self, output: &FieldDecl) -> String {
        format!("{};", output.name)
    }

    fn entry_doc_block(&self, input: &[FieldDecl], output: &FieldDecl) -> String {
        let mut out = String::from("/**");
        for field in input {
            out.push_str(&format!("\n     * @param {} ${}", field.ty, field.name));
        }
        if !input.is_empty() {
            out.push_str("\n     *");
        }
        out.push_str(&format!(
            "\n     * @return {}\n     *\n     * @throws Exception\n     */",
            output.ty
        ));
        out
    }

    fn entry_parameters(&self, input: &[FieldDecl]) -> String {
        Self::parameter_list(input, 2)
    }

    fn entry_return_type(&self, output: &FieldDecl) -> String {
        Self::return_type(output)
    }

    fn input_data(&self, input: &[FieldDecl]) -> String {
        if input.is_empty() {
            return "[]".to_owned();
        }
        let mut out = String::from("\n            [");
        for field in input {
            out.push_str(&format!(
                "\n                self::{} => ${},",
                self.field_constant_name(&field.name),
                field.name
            ));
        }
        out.push_str("\n            ]\n        ");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(name: &str, ty: &str) -> FieldDecl {
        FieldDecl {
            name: name.into(),
            ty: ty.into(),
        }
    }

    #[test]
    fn import_block_sorts_statements() {
        assert_eq!(
            import_block(&Php, ["App\\Zeta", "\\App\\Alpha", "App\\Mid"]),
            "use App\\Alpha;\nuse App\\Mid;\nuse App\\Zeta;\n"
        );
        assert_eq!(import_block(&Php, []), "");
    }

    #[test]
    fn qualify_joins_with_backslash() {
        assert_eq!(
            Php.qualify(&["App\\Workflows\\Billing\\", "Generated"]),
            "App\\Workflows\\Billing\\Generated"
        );
    }

    #[test]
    fn nullable_parameters_default_to_null() {
        let params = [decl("amount", "Int"), decl("items", "Item[]|null")];
        assert_eq!(
            Php::parameter_list(&params, 2),
            "\n        Int $amount,\n        array $items = null\n    "
        );
    }

    #[test]
    fn field_constant_uses_upper_snake() {
        let binding = FieldBinding {
            name: "totalAmount".into(),
            ty: "Int".into(),
        };
        assert_eq!(
            Php.field_constant(&binding),
            "    const FIELD_TOTAL_AMOUNT = 'totalAmount';\n"
        );
    }

    #[test]
    fn abstract_operation_without_parameters() {
        let result = decl("total", "Int|null");
        let op = OperationSig {
            name: "charge".into(),
            params: &[],
            result: &result,
        };
        let text = Php.abstract_operation(&op);
        assert!(text.contains("abstract protected function charge();"));
        assert!(text.contains("@return Int|null"));
    }

    #[test]
    fn guarded_dispatch_ends_in_a_throw() {
        let result = decl("total", "Int");
        let op = OperationSig {
            name: "charge".into(),
            params: &[],
            result: &result,
        };
        let f = DispatchFn {
            state: "Charge",
            name: "executeCharge".into(),
            operation: &op,
            branches: Branches::Guarded(vec![
                GuardedBranch {
                    guard: "$this->total > 0",
                    dispatch: Some("executeShip".into()),
                },
                GuardedBranch {
                    guard: "$this->total === 0",
                    dispatch: None,
                },
            ]),
        };
        let text = Php.dispatch_function(&f);
        assert!(text.contains("        if ($this->total > 0) {\n            $this->executeShip();\n        }"));
        assert!(text.contains(" elseif ($this->total === 0) {\n            return;\n        }"));
        assert!(text.contains(" else {\n            throw new Exception("));
    }

    #[test]
    fn empty_input_data_is_an_empty_literal() {
        assert_eq!(Php.input_data(&[]), "[]");
    }
}
