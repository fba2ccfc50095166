use crate::utils::apply_derives;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{
    Attribute, Generics, Ident, Item, LitStr, Result, Token, Type, parse::Parse,
    parse::ParseStream, parse_macro_input,
};

/// 宏种类及其允许的参数
#[derive(Clone, Copy)]
pub(crate) enum Kind {
    Command,
    Query,
    Notification,
    Response,
}

impl Kind {
    fn attr_name(self) -> &'static str {
        match self {
            Kind::Command => "command",
            Kind::Query => "query",
            Kind::Notification => "notification",
            Kind::Response => "response",
        }
    }

    fn allowed_keys(self) -> &'static [&'static str] {
        match self {
            Kind::Command => &["name", "output"],
            Kind::Query => &["name", "response"],
            Kind::Notification => &["name"],
            Kind::Response => &[],
        }
    }
}

pub(crate) fn expand(kind: Kind, attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as MessageAttrConfig);
    let mut input = parse_macro_input!(item as Item);

    if let Err(err) = cfg.check(kind) {
        return err.to_compile_error().into();
    }

    let (attrs, ident, generics): (&mut Vec<Attribute>, Ident, Generics) = match &mut input {
        Item::Struct(st) => (&mut st.attrs, st.ident.clone(), st.generics.clone()),
        Item::Enum(en) => (&mut en.attrs, en.ident.clone(), en.generics.clone()),
        other => {
            return syn::Error::new(
                other.span(),
                format!("#[{}] only supports struct or enum", kind.attr_name()),
            )
            .to_compile_error()
            .into();
        }
    };

    let mut required: Vec<syn::Path> = vec![syn::parse_quote!(Debug), syn::parse_quote!(Clone)];
    if let Kind::Response = kind {
        required.push(syn::parse_quote!(serde::Serialize));
    }
    apply_derives(attrs, required);

    let name = cfg
        .name
        .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let body: TokenStream2 = match kind {
        Kind::Command => match cfg.output {
            Some(output) => quote! {
                impl #impl_generics ::hatchgrid_application::command::CommandWithResult for #ident #ty_generics #where_clause {
                    const NAME: &'static str = #name;
                    type Output = #output;
                }
            },
            None => quote! {
                impl #impl_generics ::hatchgrid_application::command::Command for #ident #ty_generics #where_clause {
                    const NAME: &'static str = #name;
                }
            },
        },
        Kind::Query => {
            let response = cfg.response.unwrap_or_else(|| syn::parse_quote!(()));
            quote! {
                impl #impl_generics ::hatchgrid_application::query::Query for #ident #ty_generics #where_clause {
                    const NAME: &'static str = #name;
                    type Response = #response;
                }
            }
        }
        Kind::Notification => quote! {
            impl #impl_generics ::hatchgrid_application::notification::Notification for #ident #ty_generics #where_clause {
                const NAME: &'static str = #name;
            }
        },
        Kind::Response => quote! {
            impl #impl_generics ::hatchgrid_application::response::Response for #ident #ty_generics #where_clause {}
        },
    };

    TokenStream::from(quote! {
        #input

        #body
    })
}

// -------- parsing --------

// 解析键值参数：name = "<str>"、output = <Type>、response = <Type>
#[derive(Default)]
struct MessageAttrConfig {
    keys: Vec<Ident>,
    name: Option<LitStr>,
    output: Option<Type>,
    response: Option<Type>,
}

impl MessageAttrConfig {
    fn check(&self, kind: Kind) -> Result<()> {
        let allowed = kind.allowed_keys();
        for key in &self.keys {
            if !allowed.iter().any(|k| key == k) {
                let expected = if allowed.is_empty() {
                    "no arguments".to_string()
                } else {
                    allowed
                        .iter()
                        .map(|k| format!("'{k}'"))
                        .collect::<Vec<_>>()
                        .join(" | ")
                };
                return Err(syn::Error::new(
                    key.span(),
                    format!(
                        "unknown key in #[{}]; expected {expected}",
                        kind.attr_name()
                    ),
                ));
            }
        }
        Ok(())
    }
}

impl Parse for MessageAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut cfg = Self::default();
        if input.is_empty() {
            return Ok(cfg);
        }

        let pairs: Punctuated<MessageAttrKv, Token![,]> = Punctuated::parse_terminated(input)?;
        for kv in pairs {
            if cfg.keys.iter().any(|k| *k == kv.key) {
                return Err(syn::Error::new(
                    kv.key.span(),
                    format!("duplicate key '{}' in attribute", kv.key),
                ));
            }
            match kv.value {
                KvValue::Str(lit) => cfg.name = Some(lit),
                KvValue::Type(ty) if kv.key == "output" => cfg.output = Some(ty),
                KvValue::Type(ty) => cfg.response = Some(ty),
                KvValue::Unknown => {}
            }
            cfg.keys.push(kv.key);
        }
        Ok(cfg)
    }
}

struct MessageAttrKv {
    key: Ident,
    value: KvValue,
}

enum KvValue {
    Str(LitStr),
    Type(Type),
    Unknown,
}

impl Parse for MessageAttrKv {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: Ident = input.parse()?;
        let _eq: Token![=] = input.parse()?;
        let value = if key == "name" {
            KvValue::Str(input.parse()?)
        } else if key == "output" || key == "response" {
            KvValue::Type(input.parse()?)
        } else {
            // 未知键在 check 阶段按宏种类报错；这里只消费掉取值
            let _: syn::Expr = input.parse()?;
            KvValue::Unknown
        };
        Ok(Self { key, value })
    }
}
